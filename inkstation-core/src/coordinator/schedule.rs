//! Fetch schedule
//!
//! Decides from the cycle time and the cached weather which fetches this
//! cycle performs. Everything not fetched is served from the cache.

use chrono::{NaiveDateTime, Timelike};

use crate::config::ScheduleConfig;
use crate::domain::WeatherCache;

/// Fetches to perform this cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FetchPlan {
    pub current: bool,
    pub forecast: bool,
}

/// Check if `now` is the scheduled current-weather minute
pub fn current_due(now: NaiveDateTime, schedule: &ScheduleConfig) -> bool {
    now.minute() == schedule.current_weather_minute as u32
}

/// Check if `now` is the scheduled forecast time
///
/// The forecast is fetched once a day, at `forecast_hour` and the
/// current-weather minute.
pub fn forecast_due(now: NaiveDateTime, schedule: &ScheduleConfig) -> bool {
    now.hour() == schedule.forecast_hour as u32 && current_due(now, schedule)
}

impl FetchPlan {
    /// Fetch everything
    pub const ALL: FetchPlan = FetchPlan {
        current: true,
        forecast: true,
    };

    /// Decide what to fetch at `now`
    ///
    /// Besides the schedule, missing or expired cached data is refetched so
    /// a station that missed its slot catches up on the next cycle.
    pub fn decide(
        now: NaiveDateTime,
        schedule: &ScheduleConfig,
        cached: &WeatherCache,
        fetch_all: bool,
    ) -> Self {
        if fetch_all {
            return Self::ALL;
        }
        Self {
            current: current_due(now, schedule) || cached.current_expired(now),
            forecast: forecast_due(now, schedule) || cached.forecast_expired(now),
        }
    }

    /// Check if nothing is fetched
    pub fn is_empty(&self) -> bool {
        !self.current && !self.forecast
    }
}
