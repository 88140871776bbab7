//! Screen layout
//!
//! Pure geometry: named regions and the rectangles they occupy.

pub mod model;
pub mod region;

pub use model::{compute, Layout, LayoutError};
pub use region::{RegionName, FORECAST_DAYS, REGION_COUNT};
