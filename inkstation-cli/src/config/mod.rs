//! Configuration loading
//!
//! Loads the station configuration from a TOML file, applies environment
//! overrides and validates it before any cycle runs.

pub mod loader;

pub use loader::{load_config, PathsConfig};
