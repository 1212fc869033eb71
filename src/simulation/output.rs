//! Simulation output and serialization

use serde::{Deserialize, Serialize};

use crate::core::types::MissionKind;

/// One spawned unit with its rolled stats
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitResult {
    pub name: String,
    pub unit_type: String,
    pub is_leader: bool,
    pub hp: i64,
    pub aim: i64,
    pub damage: i64,
    pub will: i64,
    pub perks: Vec<String>,
}

/// One pod; `index` is the 1-based slot it was rolled in
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodResult {
    pub index: usize,
    pub category: String,
    pub leader_level: u32,
    pub is_leader_pod: bool,
    pub units: Vec<UnitResult>,
}

impl PodResult {
    pub fn leader(&self) -> Option<&UnitResult> {
        self.units.iter().find(|u| u.is_leader)
    }
}

/// Complete simulation output
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub mission: MissionKind,
    pub month: u32,
    pub research: i64,
    /// Pod slots rolled, including slots whose group pool came up empty
    pub pod_slots: usize,
    pub pods: Vec<PodResult>,
}

impl SimulationResult {
    pub fn total_units(&self) -> usize {
        self.pods.iter().map(|p| p.units.len()).sum()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "=== {} === month {} (research {}), {} of {} pod slots filled, {} units",
            self.mission,
            self.month,
            self.research,
            self.pods.len(),
            self.pod_slots,
            self.total_units()
        )];

        for pod in &self.pods {
            let commander = if pod.is_leader_pod { "COMMANDER " } else { "" };
            lines.push(format!(
                "  Pod {}: [{}{}] (Leader Lvl {})",
                pod.index, commander, pod.category, pod.leader_level
            ));
            for unit in &pod.units {
                let marker = if unit.is_leader { "*" } else { " " };
                let perks = if unit.perks.is_empty() {
                    String::new()
                } else {
                    format!(" [Perks: {}]", unit.perks.join(", "))
                };
                lines.push(format!(
                    "    {} {} | HP: {}, Aim: {}, Dmg: +{}, Will: {}{}",
                    marker, unit.name, unit.hp, unit.aim, unit.damage, unit.will, perks
                ));
            }
        }

        lines.join("\n")
    }
}
