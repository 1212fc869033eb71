//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix the strategy AI puts in front of every pod category id
pub const POD_CATEGORY_PREFIX: &str = "EPodTypeMod_";

/// Prefix of unit type identifiers (`eChar_Sectoid`)
pub const UNIT_TYPE_PREFIX: &str = "eChar_";

/// Unit type meaning "no unit in this slot"
pub const NO_UNIT: &str = "eChar_None";

/// Mission kinds recognized by the strategy AI tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MissionKind {
    #[default]
    Abduction,
    Terror,
    #[serde(rename = "UFO", alias = "Ufo")]
    Ufo,
    #[serde(rename = "BigUFO", alias = "BigUfo")]
    BigUfo,
    Special,
    Extraction,
    CaptureAndHold,
    ExaltRaid,
    AlienBase,
}

impl MissionKind {
    pub const ALL: [MissionKind; 9] = [
        MissionKind::Abduction,
        MissionKind::Terror,
        MissionKind::Ufo,
        MissionKind::BigUfo,
        MissionKind::Special,
        MissionKind::Extraction,
        MissionKind::CaptureAndHold,
        MissionKind::ExaltRaid,
        MissionKind::AlienBase,
    ];

    /// Prefix shared by this mission's table keys (`AbductionPodNumbers`, ...)
    pub fn key_prefix(self) -> &'static str {
        match self {
            MissionKind::Abduction => "Abduction",
            MissionKind::Terror => "Terror",
            MissionKind::Ufo => "UFO",
            MissionKind::BigUfo => "BigUFO",
            MissionKind::Special => "Special",
            MissionKind::Extraction => "Extraction",
            MissionKind::CaptureAndHold => "CaptureAndHold",
            MissionKind::ExaltRaid => "ExaltRaid",
            MissionKind::AlienBase => "AlienBase",
        }
    }

    /// UFO-class missions roll difficulty from ship size and always end with a commander pod
    pub fn is_ufo(self) -> bool {
        matches!(self, MissionKind::Ufo | MissionKind::BigUfo)
    }

    pub fn pod_numbers_key(self) -> String {
        format!("{}PodNumbers", self.key_prefix())
    }

    pub fn pod_numbers_modifiers_key(self) -> String {
        format!("{}PodNumbersMonthlyModifiers", self.key_prefix())
    }

    pub fn pod_types_key(self) -> String {
        format!("{}PodTypes", self.key_prefix())
    }

    pub fn pod_types_modifiers_key(self) -> String {
        format!("{}PodTypesMonthlyModifiers", self.key_prefix())
    }
}

impl fmt::Display for MissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_prefix())
    }
}

impl FromStr for MissionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        MissionKind::ALL
            .into_iter()
            .find(|kind| kind.key_prefix().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown mission kind '{}'", wanted))
    }
}

/// Composition archetype of a pod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PodCategory {
    Soldier,
    Terrorist,
    Commander,
    Elite,
    Special,
    Exalt,
    ExaltElite,
}

impl PodCategory {
    /// Parse a category id, with or without the `EPodTypeMod_` prefix
    pub fn from_id(id: &str) -> Option<Self> {
        match category_label(id.trim()) {
            "Soldier" => Some(PodCategory::Soldier),
            "Terror" | "Terrorist" => Some(PodCategory::Terrorist),
            "Commander" => Some(PodCategory::Commander),
            "Elite" => Some(PodCategory::Elite),
            "Special" => Some(PodCategory::Special),
            "Exalt" => Some(PodCategory::Exalt),
            "ExaltElite" => Some(PodCategory::ExaltElite),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            PodCategory::Soldier => "EPodTypeMod_Soldier",
            PodCategory::Terrorist => "EPodTypeMod_Terrorist",
            PodCategory::Commander => "EPodTypeMod_Commander",
            PodCategory::Elite => "EPodTypeMod_Elite",
            PodCategory::Special => "EPodTypeMod_Special",
            PodCategory::Exalt => "EPodTypeMod_Exalt",
            PodCategory::ExaltElite => "EPodTypeMod_ExaltElite",
        }
    }

    /// Base table and monthly-modifier table holding this category's unit groups
    pub fn table_keys(self) -> (&'static str, &'static str) {
        match self {
            PodCategory::Soldier => ("PossibleSoldiers", "SoldiersMonthlyModifiers"),
            PodCategory::Terrorist => ("PossibleTerrorists", "TerroristsMonthlyModifiers"),
            PodCategory::Commander => ("PossibleCommanders", "CommandersMonthlyModifiers"),
            PodCategory::Elite => ("PossibleElites", "ElitesMonthlyModifiers"),
            PodCategory::Special => ("PossibleSpecial", "SpecialMonthlyModifiers"),
            PodCategory::Exalt => ("PossibleExalt", "ExaltMonthlyModifiers"),
            PodCategory::ExaltElite => ("PossibleExaltElite", "ExaltEliteMonthlyModifiers"),
        }
    }
}

/// Display label of a category id (`EPodTypeMod_Soldier` -> `Soldier`)
pub fn category_label(id: &str) -> &str {
    id.strip_prefix(POD_CATEGORY_PREFIX).unwrap_or(id)
}

/// UFO ship types by ascending size
pub const SHIP_TYPES: [&str; 5] = [
    "eShip_UFOSmallScout",
    "eShip_UFOLargeScout",
    "eShip_UFOAbductor",
    "eShip_UFOSupply",
    "eShip_UFOBattle",
];

/// Size of a UFO ship type (`eShip_UFOSmallScout` is 0)
pub fn ship_size_of(ship_type: &str) -> Option<i64> {
    let ship_type = ship_type.trim();
    SHIP_TYPES
        .iter()
        .position(|known| known.eq_ignore_ascii_case(ship_type))
        .map(|size| size as i64)
}

/// Display name of a unit type (`eChar_Sectoid` -> `Sectoid`)
pub fn unit_display_name(unit_type: &str) -> &str {
    unit_type.strip_prefix(UNIT_TYPE_PREFIX).unwrap_or(unit_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_sizes() {
        assert_eq!(ship_size_of("eShip_UFOSmallScout"), Some(0));
        assert_eq!(ship_size_of(" eShip_UFOSupply "), Some(3));
        assert_eq!(ship_size_of("eShip_Overseer"), None);
    }

    #[test]
    fn test_mission_kind_parsing() {
        assert_eq!("ufo".parse::<MissionKind>(), Ok(MissionKind::Ufo));
        assert_eq!("BigUFO".parse::<MissionKind>(), Ok(MissionKind::BigUfo));
        assert_eq!("CaptureAndHold".parse::<MissionKind>(), Ok(MissionKind::CaptureAndHold));
        assert!("Harvest".parse::<MissionKind>().is_err());
    }

    #[test]
    fn test_mission_keys() {
        assert_eq!(MissionKind::Ufo.pod_numbers_key(), "UFOPodNumbers");
        assert_eq!(
            MissionKind::Terror.pod_types_modifiers_key(),
            "TerrorPodTypesMonthlyModifiers"
        );
        assert!(MissionKind::BigUfo.is_ufo());
        assert!(!MissionKind::AlienBase.is_ufo());
    }

    #[test]
    fn test_category_ids() {
        assert_eq!(PodCategory::from_id("EPodTypeMod_Terror"), Some(PodCategory::Terrorist));
        assert_eq!(PodCategory::from_id("EPodTypeMod_Terrorist"), Some(PodCategory::Terrorist));
        assert_eq!(PodCategory::from_id("Commander"), Some(PodCategory::Commander));
        assert_eq!(PodCategory::from_id("EPodTypeMod_Banshee"), None);
        assert_eq!(category_label("EPodTypeMod_ExaltElite"), "ExaltElite");
        assert_eq!(unit_display_name("eChar_Muton"), "Muton");
    }
}
