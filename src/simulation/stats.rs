//! Per-unit stat derivation: base stats, gated upgrades, perks and roll variance

use rand::Rng;

use crate::core::config::RESEARCH_UPGRADE_THRESHOLD;
use crate::core::types::unit_display_name;
use crate::ini::StructRecord;
use crate::simulation::output::UnitResult;
use crate::simulation::perks::PerkTable;
use crate::simulation::roll::rand_below;
use crate::tables::BaseStats;

// === BASE STAT DEFAULTS (unit type missing from the game core) ===

const DEFAULT_HP: i64 = 4;
const DEFAULT_AIM: i64 = 65;
const DEFAULT_WILL: i64 = 30;

/// HP rolls within ±1 of the computed value
const HP_VARIANCE: i64 = 1;

/// Aim rolls within ±2 of the computed value
const AIM_VARIANCE: i64 = 2;

/// When an upgrade switches on, decoded from its `iCritHit` code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeGate {
    /// Active for every unit once research reaches the threshold
    Research { min_research: i64 },
    /// Active for a pod's leader unit once the pod's leader level reaches the threshold
    Leader { min_level: i64 },
}

impl UpgradeGate {
    /// Low two digits pick the gate kind, the remaining digits are the research threshold
    pub fn from_code(code: i64) -> Self {
        let code = code.max(0);
        let low = code % 100;
        if low >= RESEARCH_UPGRADE_THRESHOLD {
            UpgradeGate::Research {
                min_research: code / 100,
            }
        } else {
            UpgradeGate::Leader { min_level: low }
        }
    }

    pub fn is_active(self, research: i64, leader_level: Option<u32>) -> bool {
        match self {
            UpgradeGate::Research { min_research } => research >= min_research,
            UpgradeGate::Leader { min_level } => leader_level
                .map(i64::from)
                .is_some_and(|level| level > 0 && level >= min_level),
        }
    }
}

/// Derives rolled stats for units of one simulation run
pub struct StatCalculator<'a> {
    base_stats: &'a BaseStats,
    upgrades: &'a [StructRecord],
    perks: &'a PerkTable,
}

impl<'a> StatCalculator<'a> {
    pub fn new(
        base_stats: &'a BaseStats,
        upgrades: &'a [StructRecord],
        perks: &'a PerkTable,
    ) -> Self {
        Self {
            base_stats,
            upgrades,
            perks,
        }
    }

    /// Roll one unit; `leader_level` is `Some` only for a pod's leader unit
    pub fn roll_unit<R: Rng + ?Sized>(
        &self,
        unit_type: &str,
        research: i64,
        leader_level: Option<u32>,
        rng: &mut R,
    ) -> UnitResult {
        let base = self.base_stats.get(unit_type);
        let base_int = |key: &str, default: i64| base.map_or(default, |b| b.get_int(key, default));

        let mut hp = base_int("HP", DEFAULT_HP);
        let mut aim = base_int("Offense", DEFAULT_AIM);
        let mut will = base_int("Will", DEFAULT_WILL);
        let mut damage = 0i64;
        let mut perks: Vec<String> = Vec::new();

        let matching = self
            .upgrades
            .iter()
            .filter(|up| up.get("eType") == Some(unit_type));

        for upgrade in matching {
            let gate = UpgradeGate::from_code(upgrade.get_int("iCritHit", 0));
            if !gate.is_active(research, leader_level) {
                continue;
            }

            hp = hp.saturating_add(upgrade.get_int("iHP", 0));
            aim = aim.saturating_add(upgrade.get_int("iAim", 0));
            damage = damage.saturating_add(upgrade.get_int("iDamage", 0));
            will = will.saturating_add(upgrade.get_int("iWill", 0));

            let perk_id = upgrade.get_int("iMobility", 0);
            if let Ok(perk_id) = u32::try_from(perk_id) {
                if perk_id > 0 {
                    let name = self.perks.name(perk_id);
                    if !perks.contains(&name) {
                        perks.push(name);
                    }
                }
            }
        }

        hp = hp.saturating_add(rand_below(rng, 2 * HP_VARIANCE + 1) - HP_VARIANCE);
        aim = aim.saturating_add(rand_below(rng, 2 * AIM_VARIANCE + 1) - AIM_VARIANCE);

        UnitResult {
            name: unit_display_name(unit_type).to_string(),
            unit_type: unit_type.to_string(),
            is_leader: leader_level.is_some(),
            hp: hp.max(1),
            aim,
            damage,
            will,
            perks,
        }
    }
}
