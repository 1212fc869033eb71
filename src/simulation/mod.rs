pub mod distribution;
pub mod output;
pub mod perks;
pub mod pods;
pub mod roll;
pub mod stats;

pub use distribution::{run_distribution, DistributionReport};
pub use output::{PodResult, SimulationResult, UnitResult};
pub use perks::PerkTable;
pub use pods::{Composition, PodSimulator};
pub use stats::{StatCalculator, UpgradeGate};

use rand::Rng;

use crate::core::config::SimConfig;
use crate::ini::{ConfigDocument, StructRecord};
use crate::tables::BaseStats;

/// Simulate one mission encounter with the standard perk names
pub fn run_simulation<R: Rng + ?Sized>(
    document: &ConfigDocument,
    base_stats: &BaseStats,
    upgrades: &[StructRecord],
    sim: &SimConfig,
    rng: &mut R,
) -> SimulationResult {
    PodSimulator::new(document, base_stats, upgrades).run(sim, rng)
}
