//! Layout geometry
//!
//! Computes the rectangle of every named region from the panel size and the
//! layout configuration. The left column holds the clock above the current
//! weather; the right column holds the forecast cells stacked above the user
//! block.
//!
//! ```text
//!  outer
//!  +------------------+--+--------------------------+
//!  | clock            |  | forecast_day_1           |
//!  |                  |  +--------------------------+
//!  |                  |  | ...                      |
//!  +------------------+  +--------------------------+
//!  | current_weather  |  | forecast_day_5           |
//!  |                  |  +--------------------------+
//!  |                  |  | user_block               |
//!  +------------------+--+--------------------------+
//!                    inter_cell
//! ```

use alloc::collections::BTreeMap;

use inkstation_display::{ContentHash, Rect};
use thiserror::Error;

use super::region::{RegionName, FORECAST_DAYS};
use crate::config::{LayoutConfig, Margins};

/// Layout computation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A ratio is outside the open interval (0, 1)
    #[error("{0} must be strictly between 0 and 1")]
    InvalidRatio(&'static str),
    /// A region would have no width or no height
    #[error("{0} region would be empty; ratios or margins are too large for the panel")]
    DegenerateRegion(RegionName),
    /// The connected panel does not have the configured dimensions
    #[error("panel is {actual_width}x{actual_height}, configured for {width}x{height}")]
    PanelMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

/// Computed region geometry
///
/// Immutable once computed. Two layouts computed from the same inputs are
/// equal and share a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    panel: Rect,
    regions: BTreeMap<RegionName, Rect>,
    icon_width: u32,
}

impl Layout {
    /// Compute the layout for a panel
    pub fn compute(width: u32, height: u32, config: &LayoutConfig) -> Result<Self, LayoutError> {
        check_ratio("split_ratio", config.split_ratio)?;
        check_ratio("clock_ratio", config.clock_ratio)?;
        check_ratio("forecast_ratio", config.forecast_ratio)?;
        check_ratio("icon_ratio", config.icon_ratio)?;

        let outer = config.margins.outer;
        let gap = config.margins.inter_cell;

        let x0 = outer;
        let y0 = outer;
        let inner_w = width.saturating_sub(outer.saturating_mul(2));
        let inner_h = height.saturating_sub(outer.saturating_mul(2));

        // Left column
        let left_w = share(inner_w, config.split_ratio);
        let clock_h = share(inner_h, config.clock_ratio);
        let current_y = y0.saturating_add(clock_h).saturating_add(gap);
        let current_h = inner_h.saturating_sub(clock_h.saturating_add(gap));

        // Right column
        let right_x = x0.saturating_add(left_w).saturating_add(gap);
        let right_w = inner_w.saturating_sub(left_w.saturating_add(gap));
        let forecast_h = share(inner_h, config.forecast_ratio);
        let cell_h = forecast_h.saturating_sub(gap.saturating_mul(FORECAST_DAYS as u32 - 1))
            / FORECAST_DAYS as u32;
        let user_y = y0.saturating_add(forecast_h).saturating_add(gap);
        let user_h = inner_h.saturating_sub(forecast_h.saturating_add(gap));

        let mut regions = BTreeMap::new();
        regions.insert(RegionName::Clock, Rect::new(x0, y0, left_w, clock_h));
        regions.insert(
            RegionName::CurrentWeather,
            Rect::new(x0, current_y, left_w, current_h),
        );
        for day in 0..FORECAST_DAYS as u32 {
            regions.insert(
                RegionName::ForecastDay(day as u8 + 1),
                Rect::new(
                    right_x,
                    y0.saturating_add(day.saturating_mul(cell_h.saturating_add(gap))),
                    right_w,
                    cell_h,
                ),
            );
        }
        regions.insert(
            RegionName::UserBlock,
            Rect::new(right_x, user_y, right_w, user_h),
        );

        // Rects of empty regions may carry offsets past the panel edge;
        // reject them before anyone looks at the coordinates.
        for (name, rect) in &regions {
            if rect.is_empty() {
                return Err(LayoutError::DegenerateRegion(*name));
            }
        }

        let icon_width = share(left_w, config.icon_ratio);
        if icon_width == 0 || icon_width >= left_w {
            return Err(LayoutError::DegenerateRegion(RegionName::CurrentWeather));
        }

        Ok(Self {
            panel: Rect::panel(width, height),
            regions,
            icon_width,
        })
    }

    /// Whole-panel rectangle
    pub fn panel(&self) -> Rect {
        self.panel
    }

    /// Rectangle of a region
    pub fn get(&self, name: RegionName) -> Option<Rect> {
        self.regions.get(&name).copied()
    }

    /// Regions and their rectangles in priority order
    pub fn iter(&self) -> impl Iterator<Item = (RegionName, Rect)> + '_ {
        self.regions.iter().map(|(name, rect)| (*name, *rect))
    }

    /// Number of regions
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Check if the layout has no regions
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Width of the icon column inside the current-weather region
    pub fn icon_width(&self) -> u32 {
        self.icon_width
    }

    /// Digest of the panel and every region rectangle
    ///
    /// Cached region state is only meaningful for the layout it was recorded
    /// against.
    pub fn fingerprint(&self) -> ContentHash {
        let mut bytes = alloc::vec::Vec::with_capacity(4 * 4 * (self.regions.len() + 1) + 4);
        for rect in core::iter::once(&self.panel).chain(self.regions.values()) {
            for v in [rect.x, rect.y, rect.width, rect.height] {
                bytes.extend_from_slice(&v.to_be_bytes());
            }
        }
        bytes.extend_from_slice(&self.icon_width.to_be_bytes());
        ContentHash::of_parts(&[b"layout", &bytes])
    }
}

/// Compute a layout from the split ratio and margins alone
///
/// The clock, forecast and icon proportions use their defaults.
pub fn compute(
    panel_width: u32,
    panel_height: u32,
    split_ratio: f32,
    margins: Margins,
) -> Result<Layout, LayoutError> {
    let config = LayoutConfig {
        split_ratio,
        margins,
        ..LayoutConfig::default()
    };
    Layout::compute(panel_width, panel_height, &config)
}

fn check_ratio(name: &'static str, ratio: f32) -> Result<(), LayoutError> {
    // NaN fails both comparisons
    if ratio > 0.0 && ratio < 1.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidRatio(name))
    }
}

/// `floor(len * ratio)`
fn share(len: u32, ratio: f32) -> u32 {
    (len as f64 * ratio as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_layout() -> Layout {
        Layout::compute(800, 600, &LayoutConfig::default()).unwrap()
    }

    #[test]
    fn test_default_geometry() {
        let layout = default_layout();
        assert_eq!(layout.len(), 8);

        // 784 inner px, 40% to the left column
        let clock = layout.get(RegionName::Clock).unwrap();
        assert_eq!(clock, Rect::new(8, 8, 313, 408));

        let current = layout.get(RegionName::CurrentWeather).unwrap();
        assert_eq!(current, Rect::new(8, 420, 313, 172));
        assert_eq!(current.bottom(), 592);

        let day1 = layout.get(RegionName::ForecastDay(1)).unwrap();
        assert_eq!(day1.x, 8 + 313 + 4);
        assert_eq!(day1.right(), 792);

        let user = layout.get(RegionName::UserBlock).unwrap();
        assert_eq!(user.bottom(), 592);
        assert!(user.y > layout.get(RegionName::ForecastDay(5)).unwrap().bottom());
    }

    #[test]
    fn test_forecast_cells_equal_height() {
        let layout = default_layout();
        let heights: alloc::vec::Vec<u32> = (1..=5)
            .map(|n| layout.get(RegionName::ForecastDay(n)).unwrap().height)
            .collect();
        assert!(heights.iter().all(|h| *h == heights[0]));
    }

    #[test]
    fn test_regions_disjoint_and_inside_panel() {
        let layout = default_layout();
        let rects: alloc::vec::Vec<(RegionName, Rect)> = layout.iter().collect();
        for (i, (_, a)) in rects.iter().enumerate() {
            assert!(layout.panel().contains_rect(a));
            for (_, b) in &rects[i + 1..] {
                assert!(!a.intersects(b), "{a} overlaps {b}");
            }
        }
    }

    #[test]
    fn test_invalid_ratio() {
        let margins = Margins::default();
        assert_eq!(
            compute(800, 600, 0.0, margins),
            Err(LayoutError::InvalidRatio("split_ratio"))
        );
        assert_eq!(
            compute(800, 600, 1.0, margins),
            Err(LayoutError::InvalidRatio("split_ratio"))
        );
        assert_eq!(
            compute(800, 600, f32::NAN, margins),
            Err(LayoutError::InvalidRatio("split_ratio"))
        );
    }

    #[test]
    fn test_margins_too_large() {
        let margins = Margins {
            outer: 400,
            inter_cell: 4,
        };
        assert_eq!(
            compute(800, 600, 0.4, margins),
            Err(LayoutError::DegenerateRegion(RegionName::Clock))
        );

        let margins = Margins {
            outer: 0,
            inter_cell: 200,
        };
        assert!(matches!(
            compute(800, 600, 0.4, margins),
            Err(LayoutError::DegenerateRegion(_))
        ));
    }

    #[test]
    fn test_fingerprint_tracks_geometry() {
        let a = default_layout();
        let b = default_layout();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let c = compute(800, 600, 0.5, Margins::default()).unwrap();
        assert_ne!(a.fingerprint(), c.fingerprint());

        let d = compute(800, 480, 0.4, Margins::default()).unwrap();
        assert_ne!(a.fingerprint(), d.fingerprint());
    }
}
