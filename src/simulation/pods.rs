//! Pod simulation: pod count, pod categories, group selection, composition and leaders
//!
//! Rolls happen in a fixed order so a seeded generator reproduces a run exactly:
//! pod count, one category per slot, then per slot the group, head-count, composition,
//! leader level and finally each unit's stat variance.

use ahash::AHashMap;
use rand::Rng;

use crate::core::config::{
    SimConfig, Tunables, MAX_LEADER_LEVEL, MAX_LEADER_RANGE, MAX_POD_SLOTS, MAX_SLOT_CHANCE,
    MAX_UNITS_PER_POD,
};
use crate::core::types::{category_label, MissionKind, PodCategory, NO_UNIT};
use crate::ini::structs::parse_record;
use crate::ini::{ConfigDocument, StructRecord};
use crate::simulation::output::{PodResult, SimulationResult, UnitResult};
use crate::simulation::perks::PerkTable;
use crate::simulation::roll::{rand_below, roll_interval, weighted_index};
use crate::simulation::stats::StatCalculator;
use crate::tables::{
    apply_modifier, monthly_modifiers, resolve, table, table_records, BaseStats, NO_CHANGE,
};

const DEFAULT_POD_NUMBERS: &str = "(MinPods=1,MaxPods=4)";
const DEFAULT_MIN_ALIENS: i64 = 1;
const DEFAULT_MAX_ALIENS: i64 = 3;
const DEFAULT_SLOT_CHANCE: i64 = 100;

/// Unit counts of a pod's three group slots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Composition {
    pub main: u32,
    pub support1: u32,
    pub support2: u32,
}

impl Composition {
    pub fn total(&self) -> u32 {
        self.main + self.support1 + self.support2
    }
}

/// Lower bound of a crash survivor roll: `count * percentage / 100`, truncated
fn survivors(count: i64, percentage: i64) -> i64 {
    let lowest = i128::from(count) * i128::from(percentage) / 100;
    lowest.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// Spawns per (category id, group record id), kept for one run only
#[derive(Debug, Default)]
struct SpawnCounters {
    counts: AHashMap<(String, usize), i64>,
}

impl SpawnCounters {
    fn get(&self, category_id: &str, record_id: usize) -> i64 {
        self.counts
            .get(&(category_id.to_string(), record_id))
            .copied()
            .unwrap_or(0)
    }

    fn increment(&mut self, category_id: &str, record_id: usize) {
        *self
            .counts
            .entry((category_id.to_string(), record_id))
            .or_insert(0) += 1;
    }
}

/// Simulates mission encounters from a configuration document
///
/// The document and game data are only borrowed; a run never modifies them.
pub struct PodSimulator<'a> {
    document: &'a ConfigDocument,
    base_stats: &'a BaseStats,
    upgrades: &'a [StructRecord],
    perks: PerkTable,
    tunables: Tunables,
}

impl<'a> PodSimulator<'a> {
    pub fn new(
        document: &'a ConfigDocument,
        base_stats: &'a BaseStats,
        upgrades: &'a [StructRecord],
    ) -> Self {
        Self {
            document,
            base_stats,
            upgrades,
            perks: PerkTable::standard(),
            tunables: Tunables::from_document(document),
        }
    }

    pub fn with_perks(mut self, perks: PerkTable) -> Self {
        self.perks = perks;
        self
    }

    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    /// Run one mission simulation
    pub fn run<R: Rng + ?Sized>(&self, sim: &SimConfig, rng: &mut R) -> SimulationResult {
        let research = sim.research();
        let effective_difficulty = sim.effective_difficulty();
        let crashed = sim.mission.is_ufo() && !sim.landed;

        let mut pod_count = self.roll_pod_count(sim, rng);
        if crashed {
            let lowest = survivors(pod_count, self.tunables.crashed_pods_percentage);
            pod_count = roll_interval(rng, lowest, pod_count);
        }
        if pod_count > MAX_POD_SLOTS {
            tracing::debug!("{}: {} pods cut to {}", sim.mission, pod_count, MAX_POD_SLOTS);
        }

        let slots = pod_count.clamp(0, MAX_POD_SLOTS) as usize;
        let categories = self.roll_pod_categories(sim, slots, rng);
        let calculator = StatCalculator::new(self.base_stats, self.upgrades, &self.perks);
        let mut counters = SpawnCounters::default();
        let mut pods = Vec::new();

        for (slot, category_id) in categories.iter().enumerate() {
            let Some(group) =
                self.select_group(category_id, sim.month, effective_difficulty, &mut counters, rng)
            else {
                tracing::debug!("Pod slot {} ({}): no eligible group", slot + 1, category_id);
                continue;
            };

            let headcount = self.roll_headcount(&group, sim.resources, crashed, rng);
            let composition = self.roll_composition(&group, headcount, rng);
            let leader_level = self.roll_leader_level(&group, research, rng);
            let units = build_units(&calculator, &group, composition, research, leader_level, rng);

            pods.push(PodResult {
                index: slot + 1,
                category: category_label(category_id).to_string(),
                leader_level,
                is_leader_pod: PodCategory::from_id(category_id) == Some(PodCategory::Commander),
                units,
            });
        }

        tracing::debug!(
            "{} month {}: {} pods from {} slots",
            sim.mission,
            sim.month,
            pods.len(),
            categories.len()
        );

        SimulationResult {
            mission: sim.mission,
            month: sim.month,
            research,
            pod_slots: categories.len(),
            pods,
        }
    }

    /// Mission whose tables a run reads; UFOs of `SmallestBigUFO` size or larger fly as BigUFO
    pub fn table_mission(&self, sim: &SimConfig) -> MissionKind {
        if sim.mission == MissionKind::Ufo && sim.ship_size() >= self.tunables.smallest_big_ufo {
            MissionKind::BigUfo
        } else {
            sim.mission
        }
    }

    /// BigUFO borrows a UFO table when it has none of its own
    fn table_owner(&self, mission: MissionKind, base_key: &str) -> MissionKind {
        if mission == MissionKind::BigUfo && table(self.document, base_key).is_none() {
            MissionKind::Ufo
        } else {
            mission
        }
    }

    /// Rolled pod count plus the mission-specific modifier; may be negative
    pub fn roll_pod_count<R: Rng + ?Sized>(&self, sim: &SimConfig, rng: &mut R) -> i64 {
        let mission = self.table_mission(sim);
        let owner = self.table_owner(mission, &mission.pod_numbers_key());
        let (base_key, modifier_key) = (owner.pod_numbers_key(), owner.pod_numbers_modifiers_key());
        let base_text = table(self.document, &base_key)
            .and_then(|value| value.first())
            .unwrap_or(DEFAULT_POD_NUMBERS);

        let mut numbers = parse_record(base_text);
        for modifier in monthly_modifiers(self.document, &modifier_key, sim.month) {
            apply_modifier(&mut numbers, &modifier, NO_CHANGE);
        }

        let min_pods = numbers.get_int("MinPods", 1);
        let max_pods = numbers.get_int("MaxPods", 4);
        let rolled = roll_interval(rng, min_pods, max_pods);

        let modifier = match sim.mission {
            MissionKind::Abduction => {
                let steps = sim.difficulty.saturating_sub(2) as f64;
                (steps * self.tunables.pods_difficulty_multiplier).floor() as i64
            }
            MissionKind::Ufo | MissionKind::BigUfo => {
                (sim.ship_size() as f64 * self.tunables.ship_size_multiplier).floor() as i64
            }
            _ => 0,
        };

        tracing::trace!(
            "{}: pods {}..={} rolled {} modifier {}",
            sim.mission,
            min_pods,
            max_pods,
            rolled,
            modifier
        );
        rolled.saturating_add(modifier)
    }

    /// Category weights of the mission, monthly modifiers applied, in first-seen order
    pub fn category_weights(&self, mission: MissionKind, month: u32) -> Vec<(String, i64)> {
        let mission = self.table_owner(mission, &mission.pod_types_key());
        let mut weights: Vec<(String, i64)> = Vec::new();
        let mut upsert = |id: &str, chance: i64| match weights.iter_mut().find(|(k, _)| k == id) {
            Some(entry) => entry.1 = chance,
            None => weights.push((id.to_string(), chance)),
        };

        for record in table_records(self.document, &mission.pod_types_key()) {
            match record.get("ID") {
                Some(id) => upsert(id, record.get_int("TypeChance", 0)),
                None => tracing::debug!("{}: pod type without ID", mission.pod_types_key()),
            }
        }

        let modifier_key = mission.pod_types_modifiers_key();
        for modifier in monthly_modifiers(self.document, &modifier_key, month) {
            let (Some(id), Some(chance)) = (modifier.get("ID"), modifier.get("TypeChance")) else {
                continue;
            };
            if NO_CHANGE.contains(&chance) {
                continue;
            }
            upsert(id, modifier.get_int("TypeChance", 0));
        }

        weights
    }

    /// One category id per pod slot
    pub fn roll_pod_categories<R: Rng + ?Sized>(
        &self,
        sim: &SimConfig,
        slots: usize,
        rng: &mut R,
    ) -> Vec<String> {
        let weights = self.category_weights(self.table_mission(sim), sim.month);
        let chances: Vec<i64> = weights.iter().map(|(_, chance)| *chance).collect();

        let mut categories: Vec<String> = if chances.iter().any(|chance| *chance > 0) {
            (0..slots)
                .filter_map(|_| weighted_index(rng, &chances).map(|i| weights[i].0.clone()))
                .collect()
        } else {
            vec![PodCategory::Soldier.id().to_string(); slots]
        };

        if sim.mission.is_ufo() {
            if let Some(last) = categories.last_mut() {
                *last = PodCategory::Commander.id().to_string();
            }
        }

        categories
    }

    /// Pick a group for a pod of `category_id`, counting it against its `PodLimit`
    fn select_group<R: Rng + ?Sized>(
        &self,
        category_id: &str,
        month: u32,
        effective_difficulty: i64,
        counters: &mut SpawnCounters,
        rng: &mut R,
    ) -> Option<StructRecord> {
        let category = PodCategory::from_id(category_id).unwrap_or(PodCategory::Soldier);
        let (base_key, modifier_key) = category.table_keys();
        let pool = resolve(self.document, base_key, modifier_key, month);

        let candidates = self.eligible_groups(category_id, pool, effective_difficulty, counters);
        let chances: Vec<i64> = candidates.iter().map(|(_, chance)| *chance).collect();
        let (group, _) = candidates.into_iter().nth(weighted_index(rng, &chances)?)?;

        counters.increment(category_id, group.id().unwrap_or(0));
        Some(group)
    }

    /// Groups still under their `PodLimit`, with chance adjusted for difficulty
    ///
    /// The adjusted chance is what the final `> 0` check and the weighted draw see.
    fn eligible_groups(
        &self,
        category_id: &str,
        pool: Vec<StructRecord>,
        effective_difficulty: i64,
        counters: &SpawnCounters,
    ) -> Vec<(StructRecord, i64)> {
        let divisor = self.tunables.diff_probability_divisor;
        let mut candidates = Vec::new();

        for record in pool {
            let limit = record.get_int("PodLimit", -1);
            if limit > -1 && counters.get(category_id, record.id().unwrap_or(0)) >= limit {
                continue;
            }

            let mut chance = record.get_int("PodChance", 0);
            let pod_difficulty = record.get_int("PodDifficulty", 0);
            if pod_difficulty > effective_difficulty {
                if !(self.tunables.diff_decrease_probability && divisor > 0.0) {
                    continue;
                }
                let gap = pod_difficulty as f64 - effective_difficulty as f64;
                chance = (chance as f64 / (divisor * gap)).floor() as i64;
            }

            if chance > 0 {
                candidates.push((record, chance));
            }
        }

        candidates
    }

    /// Units in the pod, after resource scaling and crash losses, within 1..=8
    fn roll_headcount<R: Rng + ?Sized>(
        &self,
        group: &StructRecord,
        resources: u32,
        crashed: bool,
        rng: &mut R,
    ) -> i64 {
        let min_aliens = group.get_int("MinAliens", DEFAULT_MIN_ALIENS);
        let max_aliens = group.get_int("MaxAliens", DEFAULT_MAX_ALIENS);
        let mut count = roll_interval(rng, min_aliens, max_aliens);

        if self.tunables.enable_resources {
            let extra = f64::from(resources) * self.tunables.aliens_per_resource_multiplier;
            count = count.saturating_add(extra.floor() as i64);
        }

        if crashed {
            let lowest = survivors(count, self.tunables.crashed_aliens_percentage);
            count = roll_interval(rng, lowest, count);
        }

        count.clamp(1, MAX_UNITS_PER_POD)
    }

    /// Split the head-count between main, support1 and support2
    ///
    /// Only one main unit is drawn per pod; its chance drops to zero once one is chosen.
    pub fn roll_composition<R: Rng + ?Sized>(
        &self,
        group: &StructRecord,
        headcount: i64,
        rng: &mut R,
    ) -> Composition {
        let chance = |key: &str| {
            group
                .get_int(key, DEFAULT_SLOT_CHANCE)
                .clamp(0, MAX_SLOT_CHANCE)
        };
        let main_chance = chance("MainChance");
        let support1_chance = chance("Support1Chance");
        let support2_chance = chance("Support2Chance");

        let mut composition = Composition::default();
        for _ in 0..headcount.max(0) {
            let main = if composition.main > 0 { 0 } else { main_chance };
            let (support1, support2) = if main + support1_chance + support2_chance == 0 {
                (DEFAULT_SLOT_CHANCE, DEFAULT_SLOT_CHANCE)
            } else {
                (support1_chance, support2_chance)
            };

            let roll = rand_below(rng, main + support1 + support2);
            if roll < main {
                composition.main += 1;
            } else if roll < main + support1 {
                composition.support1 += 1;
            } else {
                composition.support2 += 1;
            }
        }

        if self.tunables.always_spawn_main && composition.main == 0 && headcount > 0 {
            composition.main = 1;
            if composition.support1 > composition.support2 {
                composition.support1 -= 1;
            } else {
                composition.support2 -= 1;
            }
        }

        composition
    }

    /// Leader level, forced by the group or rolled from research progress
    pub fn roll_leader_level<R: Rng + ?Sized>(
        &self,
        group: &StructRecord,
        research: i64,
        rng: &mut R,
    ) -> u32 {
        if !self.tunables.enable_leaders {
            return 0;
        }

        let forced = group.get_int("LeaderLevel", -1);
        if forced >= 0 {
            return u32::try_from(forced).unwrap_or(u32::MAX);
        }

        let range = ((research as f64 * self.tunables.leader_level_progression_multiplier + 1.0)
            .floor() as i64)
            .clamp(1, MAX_LEADER_RANGE);
        let mut level = rand_below(rng, range);
        if level > MAX_LEADER_LEVEL {
            level = MAX_LEADER_LEVEL - rand_below(rng, MAX_LEADER_RANGE + 1 - range);
        }

        level.clamp(0, MAX_LEADER_LEVEL) as u32
    }
}

/// Roll every unit of the pod; the first main unit leads it
fn build_units<R: Rng + ?Sized>(
    calculator: &StatCalculator<'_>,
    group: &StructRecord,
    composition: Composition,
    research: i64,
    leader_level: u32,
    rng: &mut R,
) -> Vec<UnitResult> {
    let slots = [
        (group.get("MainAlien"), composition.main, true),
        (group.get("SupportAlien1"), composition.support1, false),
        (group.get("SupportAlien2"), composition.support2, false),
    ];

    let mut units = Vec::with_capacity(composition.total() as usize);
    for (unit_type, count, is_main) in slots {
        let Some(unit_type) = unit_type.filter(|t| !t.is_empty() && *t != NO_UNIT) else {
            continue;
        };
        for n in 0..count {
            let leader = (is_main && n == 0).then_some(leader_level);
            units.push(calculator.roll_unit(unit_type, research, leader, rng));
        }
    }
    units
}
