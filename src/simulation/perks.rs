//! Perk id to display name lookup

use ahash::AHashMap;
use std::sync::OnceLock;

const STANDARD_PERKS: [(u32, &str); 23] = [
    (1, "Ready For Anything"),
    (2, "Flush"),
    (3, "Rapid Fire"),
    (4, "Sentinel"),
    (5, "Tactical Sense"),
    (6, "Aggression"),
    (7, "Lightning Reflexes"),
    (8, "Suppression"),
    (10, "In The Zone"),
    (14, "Dampening Field"),
    (15, "Hardened"),
    (16, "Squadsight"),
    (17, "Low Profile"),
    (25, "Close Encounters"),
    (26, "Sprinter"),
    (32, "Reinforced Armor"),
    (44, "Vital Point Targeting"),
    (64, "Regeneration"),
    (70, "Damage Control"),
    (71, "Shock-Absorbent Armor"),
    (77, "Executioner"),
    (80, "Opportunist"),
    (91, "Covering Fire"),
];

static PERK_NAMES: OnceLock<AHashMap<u32, &'static str>> = OnceLock::new();

/// Standard perk names (built on first use, never modified)
pub fn perk_names() -> &'static AHashMap<u32, &'static str> {
    PERK_NAMES.get_or_init(|| STANDARD_PERKS.into_iter().collect())
}

pub fn perk_name(id: u32) -> Option<&'static str> {
    perk_names().get(&id).copied()
}

/// Perk lookup with optional per-load names layered over the standard table
#[derive(Debug, Clone, Default)]
pub struct PerkTable {
    overrides: AHashMap<u32, String>,
}

impl PerkTable {
    pub fn standard() -> Self {
        Self::default()
    }

    pub fn insert_override(&mut self, id: u32, name: impl Into<String>) {
        self.overrides.insert(id, name.into());
    }

    pub fn has_override(&self, id: u32) -> bool {
        self.overrides.contains_key(&id)
    }

    /// Display name, falling back to `Perk N` for unknown ids
    pub fn name(&self, id: u32) -> String {
        self.overrides
            .get(&id)
            .cloned()
            .or_else(|| perk_name(id).map(str::to_string))
            .unwrap_or_else(|| format!("Perk {}", id))
    }
}
