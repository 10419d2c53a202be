//! CLI command implementations

pub mod config;
pub mod registry;
pub mod update;
