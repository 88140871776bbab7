//! Configuration types
//!
//! Board-agnostic station configuration, loaded from TOML by the host binary.

pub mod types;

pub use types::*;
