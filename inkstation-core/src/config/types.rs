//! Configuration type definitions
//!
//! These types represent the station configuration. They are deserialized
//! from TOML by the host binary; every section falls back to defaults so a
//! minimal file only lists what differs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Temperature units reported by the weather provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Degrees Celsius
    #[default]
    Metric,
    /// Degrees Fahrenheit
    Imperial,
}

impl Units {
    /// Suffix appended to rendered temperatures
    pub const fn suffix(self) -> &'static str {
        match self {
            Units::Metric => "\u{b0}C",
            Units::Imperial => "\u{b0}F",
        }
    }
}

/// Panel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Panel width in pixels
    pub width: u32,
    /// Panel height in pixels
    pub height: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Padding configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    /// Padding between the panel edge and every region (px)
    pub outer: u32,
    /// Gap between adjacent regions and forecast cells (px)
    pub inter_cell: u32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            outer: 8,
            inter_cell: 4,
        }
    }
}

/// Screen split configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Share of the inner width given to the left (clock + current weather) column
    pub split_ratio: f32,
    /// Share of the left column height given to the clock
    pub clock_ratio: f32,
    /// Share of the right column height given to the forecast cells
    pub forecast_ratio: f32,
    /// Share of the current-weather width given to the icon
    pub icon_ratio: f32,
    /// Padding
    pub margins: Margins,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            split_ratio: 0.4,
            clock_ratio: 0.7,
            forecast_ratio: 0.75,
            icon_ratio: 0.4,
            margins: Margins::default(),
        }
    }
}

/// Fetch schedule configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Minute of every hour at which current weather is refetched (0-59)
    pub current_weather_minute: u8,
    /// Hour of the day at which the forecast is refetched (0-23)
    pub forecast_hour: u8,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            current_weather_minute: 0,
            forecast_hour: 0,
        }
    }
}

/// Panel refresh policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Cycles a region may go without a full refresh before it is forced dirty
    pub max_partial_age: u32,
    /// Partial refreshes a region may accumulate before its next write is full
    pub ghosting_threshold: u32,
    /// Merge an all-full plan into a single whole-panel refresh
    pub coalesce_full: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            // Once a day at one cycle per minute
            max_partial_age: 24 * 60,
            ghosting_threshold: 60,
            coalesce_full: true,
        }
    }
}

/// Location passed to the weather provider
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

/// Complete station configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    pub panel: PanelConfig,
    pub layout: LayoutConfig,
    pub schedule: ScheduleConfig,
    pub refresh: RefreshConfig,
    pub location: LocationConfig,
    pub units: Units,
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Minute outside 0-59
    #[error("current_weather_minute {0} is not a minute (0-59)")]
    InvalidMinute(u8),
    /// Hour outside 0-23
    #[error("forecast_hour {0} is not an hour (0-23)")]
    InvalidHour(u8),
    /// A refresh threshold was zero
    #[error("refresh.{0} must be at least 1")]
    ZeroThreshold(&'static str),
}

impl StationConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the values layout computation does not cover
    ///
    /// Geometry is validated by the layout model itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schedule.current_weather_minute >= 60 {
            return Err(ConfigError::InvalidMinute(
                self.schedule.current_weather_minute,
            ));
        }
        if self.schedule.forecast_hour >= 24 {
            return Err(ConfigError::InvalidHour(self.schedule.forecast_hour));
        }
        if self.refresh.max_partial_age == 0 {
            return Err(ConfigError::ZeroThreshold("max_partial_age"));
        }
        if self.refresh.ghosting_threshold == 0 {
            return Err(ConfigError::ZeroThreshold("ghosting_threshold"));
        }
        Ok(())
    }
}
