//! Pod Sim - strategy AI encounter simulator
//!
//! Reads the strategy AI configuration, resolves its monthly-modified spawn tables
//! and rolls the alien pods a mission would field.

pub mod core;
pub mod ini;
pub mod simulation;
pub mod tables;

pub use crate::core::{MissionKind, PodCategory, PodSimError, Result, SimConfig, Tunables};
pub use ini::{
    generate_config, load_config_file, parse_config, parse_struct_fields, parse_struct_record,
    write_config_file, ConfigDocument, StructRecord, Value,
};
pub use simulation::{
    run_distribution, run_simulation, DistributionReport, PodSimulator, SimulationResult,
};
pub use tables::GameCore;
