//! Rendering
//!
//! Draws the snapshot into per-region 1-bit bitmaps.

mod icons;
pub mod renderer;
mod text;

pub use renderer::{render, RenderError, RenderedContent};
