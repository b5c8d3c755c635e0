//! Engine Configuration Module
//!
//! Provides engine configuration loaded from TOML files, replacing all
//! hardcoded interference thresholds with operator-tunable values.
//!
//! ## Loading Order
//!
//! 1. `IONOSENSE_CONFIG` environment variable (path to TOML file)
//! 2. `ionosense.toml` in the current working directory
//! 3. Built-in defaults (matching the constants in
//!    `types::interference_thresholds`)
//!
//! The loaded [`EngineConfig`] is passed explicitly into the engine and the
//! glue loops — there is no process-global config in the core.

mod engine_config;
pub mod defaults;

pub use engine_config::*;
