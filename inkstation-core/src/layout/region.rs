//! Named screen regions

use serde::{Deserialize, Serialize};

/// Number of forecast day cells in the right column
pub const FORECAST_DAYS: usize = 5;

/// Total number of named regions
pub const REGION_COUNT: usize = FORECAST_DAYS + 3;

/// Named screen region
///
/// The derived ordering is the redraw priority order: clock, current
/// weather, forecast days 1 to 5, user block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RegionName {
    /// Two-line clock, top of the left column
    Clock,
    /// Current conditions, bottom of the left column
    CurrentWeather,
    /// Forecast cell, numbered 1 to `FORECAST_DAYS` from the top
    ForecastDay(u8),
    /// Free-form block below the forecast cells
    UserBlock,
}

impl RegionName {
    /// Every region, in priority order
    pub const ALL: [RegionName; REGION_COUNT] = [
        RegionName::Clock,
        RegionName::CurrentWeather,
        RegionName::ForecastDay(1),
        RegionName::ForecastDay(2),
        RegionName::ForecastDay(3),
        RegionName::ForecastDay(4),
        RegionName::ForecastDay(5),
        RegionName::UserBlock,
    ];

    /// Stable snake_case name used in logs and reports
    pub const fn as_str(self) -> &'static str {
        match self {
            RegionName::Clock => "clock",
            RegionName::CurrentWeather => "current_weather",
            RegionName::ForecastDay(1) => "forecast_day_1",
            RegionName::ForecastDay(2) => "forecast_day_2",
            RegionName::ForecastDay(3) => "forecast_day_3",
            RegionName::ForecastDay(4) => "forecast_day_4",
            RegionName::ForecastDay(5) => "forecast_day_5",
            RegionName::ForecastDay(_) => "forecast_day_?",
            RegionName::UserBlock => "user_block",
        }
    }

    /// Zero-based forecast index for forecast cells
    pub const fn forecast_index(self) -> Option<usize> {
        match self {
            RegionName::ForecastDay(n) if n >= 1 => Some(n as usize - 1),
            _ => None,
        }
    }
}

impl core::fmt::Display for RegionName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        let mut sorted = RegionName::ALL;
        sorted.sort();
        assert_eq!(sorted, RegionName::ALL);
        assert!(RegionName::ForecastDay(5) < RegionName::UserBlock);
        assert!(RegionName::CurrentWeather < RegionName::ForecastDay(1));
    }

    #[test]
    fn test_names() {
        assert_eq!(RegionName::Clock.as_str(), "clock");
        assert_eq!(RegionName::ForecastDay(3).as_str(), "forecast_day_3");
        assert_eq!(RegionName::ForecastDay(3).forecast_index(), Some(2));
        assert_eq!(RegionName::UserBlock.forecast_index(), None);
    }
}
