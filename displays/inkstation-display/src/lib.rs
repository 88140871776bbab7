//! Panel abstraction and shared pixel buffers for Inkstation
//!
//! This crate provides:
//! - `DisplayController` trait for e-paper panels with a split write/refresh protocol
//! - `RefreshMode` for choosing between a clean full refresh and a fast partial one
//! - `Bitmap`, a 1-bit-per-pixel buffer that `embedded-graphics` can draw into
//! - `Rect` geometry in panel pixel coordinates
//!
//! # Architecture
//!
//! The station core renders every screen region into its own `Bitmap`, hashes it,
//! and decides which regions to push. Panel modules implement `DisplayController`
//! with their hardware-specific code; the core never talks to a panel directly.
//!
//! ## Update protocol
//!
//! A panel update is always two steps:
//!
//! 1. `write_region(bitmap, rect)` loads pixels into the controller's frame memory
//! 2. `refresh(mode)` makes pending pixels visible, either with a full waveform
//!    (slow, flashes, clears ghosting) or a partial one (fast, accumulates ghosting)

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod backend;
pub mod bitmap;
pub mod geometry;

// Re-export key types
pub use backend::{DisplayController, DisplayError, RefreshMode};
pub use bitmap::{Bitmap, ContentHash};
pub use geometry::Rect;
