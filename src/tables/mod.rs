//! Configuration tables: monthly-modifier resolution and game core data

pub mod game_core;
pub mod resolver;

pub use game_core::{BaseStats, GameCore};
pub use resolver::{
    apply_modifier, monthly_modifiers, resolve, setting, table, table_records, GROUP_NO_CHANGE,
    NO_CHANGE,
};
