pub mod config;
pub mod error;
pub mod types;

pub use config::{SimConfig, Tunables, STRATEGY_AI_SECTION};
pub use error::{PodSimError, Result};
pub use types::{MissionKind, PodCategory};
