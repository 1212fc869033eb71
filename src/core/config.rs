//! Simulation configuration with documented constants
//!
//! Tunables are read from the strategy AI section of a configuration document; every
//! one has a hard-coded default so a partial or empty document still simulates.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::Result;
use crate::core::types::{ship_size_of, MissionKind};
use crate::ini::ConfigDocument;
use crate::tables::setting;

/// Section holding every strategy AI table and tunable
pub const STRATEGY_AI_SECTION: &str = "XComStrategyAIMutator.XGStrategyAI_Mod";

/// Research progress gained per campaign month
pub const RESEARCH_PER_MONTH: i64 = 28;

/// Hard cap on units in a single pod
pub const MAX_UNITS_PER_POD: i64 = 8;

/// Hard cap on pod slots in one mission; larger rolled counts are cut down to it
pub const MAX_POD_SLOTS: i64 = 64;

/// Composition chances are read within `0..=MAX_SLOT_CHANCE`
pub const MAX_SLOT_CHANCE: i64 = 1_000_000;

/// Size of the smallest ship flown as a BigUFO mission (`eShip_UFOSupply`)
pub const DEFAULT_SMALLEST_BIG_UFO: i64 = 3;

/// Highest leader level a pod can roll
pub const MAX_LEADER_LEVEL: i64 = 7;

/// Upper bound of the leader level roll range
pub const MAX_LEADER_RANGE: i64 = 15;

/// Upgrade codes whose low two digits reach this value gate on research, not leader level
pub const RESEARCH_UPGRADE_THRESHOLD: i64 = 15;

/// Global tunables read once per simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct Tunables {
    /// Leader roll range grows by `research * multiplier`
    pub leader_level_progression_multiplier: f64,

    /// Extra units per pod per point of alien resources
    pub aliens_per_resource_multiplier: f64,

    /// Divides a group's chance per point it is above mission difficulty
    pub diff_probability_divisor: f64,

    /// Abduction pods gained per difficulty step above 2
    pub pods_difficulty_multiplier: f64,

    /// UFO pods gained per ship size step
    pub ship_size_multiplier: f64,

    pub enable_leaders: bool,
    pub enable_resources: bool,
    pub always_spawn_main: bool,

    /// Scale down chance of too-difficult groups instead of excluding them
    pub diff_decrease_probability: bool,

    /// Share of rolled pods that survive a UFO crash
    pub crashed_pods_percentage: i64,

    /// Share of each pod's units that survive a UFO crash
    pub crashed_aliens_percentage: i64,

    /// UFO missions on ships at least this size use the BigUFO tables
    pub smallest_big_ufo: i64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            leader_level_progression_multiplier: 0.025,
            aliens_per_resource_multiplier: 0.0075,
            diff_probability_divisor: 2.0,
            pods_difficulty_multiplier: 1.0,
            ship_size_multiplier: 1.0,
            enable_leaders: true,
            enable_resources: true,
            always_spawn_main: true,
            diff_decrease_probability: false,
            crashed_pods_percentage: 70,
            crashed_aliens_percentage: 60,
            smallest_big_ufo: DEFAULT_SMALLEST_BIG_UFO,
        }
    }
}

impl Tunables {
    /// Read tunables from a document, falling back to defaults key by key
    pub fn from_document(document: &ConfigDocument) -> Self {
        let defaults = Self::default();

        let float = |key: &str, default: f64| {
            setting(document, key)
                .and_then(|raw| raw.parse::<f64>().ok())
                .unwrap_or(default)
        };
        let flag = |key: &str, default: bool| {
            setting(document, key)
                .map(|raw| raw.eq_ignore_ascii_case("true"))
                .unwrap_or(default)
        };
        let percentage = |key: &str, default: i64| {
            setting(document, key)
                .and_then(crate::ini::structs::coerce_int)
                .unwrap_or(default)
                .clamp(0, 100)
        };

        Self {
            leader_level_progression_multiplier: float(
                "LeaderLevelProgressionMultiplier",
                defaults.leader_level_progression_multiplier,
            ),
            aliens_per_resource_multiplier: float(
                "AdditionalAliensPerPodMultiplier",
                defaults.aliens_per_resource_multiplier,
            ),
            diff_probability_divisor: float(
                "DiffProbabilityDivisor",
                defaults.diff_probability_divisor,
            ),
            pods_difficulty_multiplier: float(
                "PodsDifficultyMultiplier",
                defaults.pods_difficulty_multiplier,
            ),
            ship_size_multiplier: float("ShipSizeMultiplier", defaults.ship_size_multiplier),
            enable_leaders: flag("EnableAlienLeaders", defaults.enable_leaders),
            enable_resources: flag("EnableAlienResources", defaults.enable_resources),
            always_spawn_main: flag(
                "AlwaysSpawnAtLeastOneMainAlien",
                defaults.always_spawn_main,
            ),
            diff_decrease_probability: flag(
                "DiffDecreaseProbability",
                defaults.diff_decrease_probability,
            ),
            crashed_pods_percentage: percentage(
                "CrashedUFOSurviedPodsPercentage",
                defaults.crashed_pods_percentage,
            ),
            crashed_aliens_percentage: percentage(
                "CrashedUFOSurvedAliensPercentage",
                defaults.crashed_aliens_percentage,
            ),
            smallest_big_ufo: setting(document, "SmallestBigUFO")
                .and_then(ship_size_of)
                .unwrap_or(defaults.smallest_big_ufo),
        }
    }
}

/// Mission parameters for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub mission: MissionKind,
    pub month: u32,
    pub resources: u32,
    pub difficulty: i64,
    /// Only read for UFO-class missions; takes precedence over `ship_type`
    pub ship_size: Option<i64>,
    /// Ship type name (`eShip_UFOAbductor`), mapped to a size when `ship_size` is unset
    pub ship_type: Option<String>,
    /// A UFO that crashed instead of landing loses part of its crew
    pub landed: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            mission: MissionKind::Abduction,
            month: 0,
            resources: 0,
            difficulty: 1,
            ship_size: None,
            ship_type: None,
            landed: true,
        }
    }
}

impl SimConfig {
    pub fn new(mission: MissionKind) -> Self {
        Self {
            mission,
            ..Self::default()
        }
    }

    /// Research progress implied by the campaign month
    pub fn research(&self) -> i64 {
        i64::from(self.month) * RESEARCH_PER_MONTH
    }

    /// Explicit size, else the size of the named ship type, else 0
    pub fn ship_size(&self) -> i64 {
        self.ship_size
            .or_else(|| self.ship_type.as_deref().and_then(ship_size_of))
            .unwrap_or(0)
    }

    /// Difficulty compared against group `PodDifficulty`; ship size for UFO missions
    pub fn effective_difficulty(&self) -> i64 {
        if self.mission.is_ufo() {
            self.ship_size()
        } else {
            self.difficulty
        }
    }

    /// Parse a TOML scenario (`mission = "Terror"`, `month = 6`, ...)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
