//! Display controller trait
//!
//! Defines the interface the station core uses to drive a panel.

use thiserror::Error;

use crate::bitmap::Bitmap;
use crate::geometry::Rect;

/// Display controller errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DisplayError {
    /// Communication error with the panel
    #[error("panel communication failed")]
    Communication,
    /// Region lies outside the panel or does not match the bitmap
    #[error("region is outside the panel or does not match the bitmap")]
    InvalidRegion,
    /// Panel not initialized
    #[error("panel not initialized")]
    NotInitialized,
    /// Panel still busy with a previous waveform
    #[error("panel busy")]
    Busy,
}

/// Panel refresh waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RefreshMode {
    /// Clean redraw; slow and visible, clears accumulated ghosting
    Full,
    /// Fast redraw of the written area; accumulates ghosting
    Partial,
}

impl RefreshMode {
    /// Lowercase name used in logs
    pub const fn as_str(self) -> &'static str {
        match self {
            RefreshMode::Full => "full",
            RefreshMode::Partial => "partial",
        }
    }
}

impl core::fmt::Display for RefreshMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display controller trait
///
/// Provides a hardware-agnostic interface for e-paper panels.
/// Implementations are driven serially by a single update cycle; a cycle
/// issues `write_region` followed by `refresh` for every plan entry.
pub trait DisplayController {
    /// Get the panel dimensions in pixels as (width, height)
    fn dimensions(&self) -> (u32, u32);

    /// Load a bitmap into the controller's frame memory at `rect`
    ///
    /// The bitmap dimensions must equal the rect dimensions. Nothing becomes
    /// visible until the next `refresh`.
    fn write_region(&mut self, bitmap: &Bitmap, rect: Rect) -> Result<(), DisplayError>;

    /// Make pending writes visible using the given waveform
    fn refresh(&mut self, mode: RefreshMode) -> Result<(), DisplayError>;
}

impl<T: DisplayController + ?Sized> DisplayController for &mut T {
    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }

    fn write_region(&mut self, bitmap: &Bitmap, rect: Rect) -> Result<(), DisplayError> {
        (**self).write_region(bitmap, rect)
    }

    fn refresh(&mut self, mode: RefreshMode) -> Result<(), DisplayError> {
        (**self).refresh(mode)
    }
}
