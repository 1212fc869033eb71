//! Repeated seeded runs aggregated into spawn statistics

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use crate::core::config::SimConfig;
use crate::simulation::output::SimulationResult;
use crate::simulation::pods::PodSimulator;

/// Aggregate of many simulation runs of the same mission
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DistributionReport {
    pub runs: u64,
    pub seed: u64,
    /// Runs by number of filled pods
    pub pod_counts: BTreeMap<usize, u64>,
    /// Pods by category label
    pub categories: BTreeMap<String, u64>,
    /// Pods by the display name of their leader unit
    pub leaders: BTreeMap<String, u64>,
    pub total_pods: u64,
    /// Pod slots whose group pool came up empty
    pub empty_slots: u64,
    pub mean_units_per_pod: f64,
    pub mean_leader_level: f64,
}

impl DistributionReport {
    fn from_results(results: &[SimulationResult], seed: u64) -> Self {
        let mut report = DistributionReport {
            runs: results.len() as u64,
            seed,
            ..Default::default()
        };

        let mut units = 0u64;
        let mut leader_levels = 0u64;

        for result in results {
            *report.pod_counts.entry(result.pods.len()).or_insert(0) += 1;
            report.empty_slots += (result.pod_slots - result.pods.len()) as u64;

            for pod in &result.pods {
                report.total_pods += 1;
                units += pod.units.len() as u64;
                leader_levels += u64::from(pod.leader_level);
                *report.categories.entry(pod.category.clone()).or_insert(0) += 1;
                if let Some(leader) = pod.leader() {
                    *report.leaders.entry(leader.name.clone()).or_insert(0) += 1;
                }
            }
        }

        if report.total_pods > 0 {
            report.mean_units_per_pod = units as f64 / report.total_pods as f64;
            report.mean_leader_level = leader_levels as f64 / report.total_pods as f64;
        }
        report
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary(&self) -> String {
        let share = |count: u64, total: u64| {
            if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            }
        };

        let mut lines = vec![
            format!("=== {} runs (seed {}) ===", self.runs, self.seed),
            format!(
                "{} pods, {} empty slots, {:.2} units/pod, leader level {:.2}",
                self.total_pods, self.empty_slots, self.mean_units_per_pod, self.mean_leader_level
            ),
            "Pods per mission:".to_string(),
        ];
        for (pods, count) in &self.pod_counts {
            lines.push(format!("  {:>2}: {:6.2}%", pods, share(*count, self.runs)));
        }
        lines.push("Categories:".to_string());
        for (category, count) in &self.categories {
            lines.push(format!("  {:<12} {:6.2}%", category, share(*count, self.total_pods)));
        }
        lines.push("Leaders:".to_string());
        for (name, count) in &self.leaders {
            lines.push(format!("  {:<20} {:6.2}%", name, share(*count, self.total_pods)));
        }
        lines.join("\n")
    }
}

/// Run `runs` simulations in parallel; run `i` is seeded with `seed + i`
pub fn run_distribution(
    simulator: &PodSimulator<'_>,
    sim: &SimConfig,
    runs: u64,
    seed: u64,
) -> DistributionReport {
    let results: Vec<SimulationResult> = (0..runs)
        .into_par_iter()
        .map(|i| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(i));
            simulator.run(sim, &mut rng)
        })
        .collect();

    tracing::info!("Completed {} runs of {}", results.len(), sim.mission);
    DistributionReport::from_results(&results, seed)
}
