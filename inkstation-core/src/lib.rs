//! Board-agnostic core logic for the e-paper weather station
//!
//! This crate contains everything between the weather provider and the
//! panel driver that does not depend on a specific host or panel:
//!
//! - Station configuration types
//! - Layout geometry for the named screen regions
//! - Region rendering into 1-bit bitmaps
//! - Per-region content cache and its persisted record format
//! - Refresh planning (full vs partial per region)
//! - The update cycle that ties them together
//! - Collaborator traits (weather provider, state store, clock)

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod cache;
pub mod config;
pub mod coordinator;
pub mod domain;
pub mod layout;
pub mod planner;
pub mod render;
pub mod traits;

pub use inkstation_display::{
    Bitmap, ContentHash, DisplayController, DisplayError, Rect, RefreshMode,
};
