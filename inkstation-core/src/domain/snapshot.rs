//! Domain snapshot
//!
//! Everything the renderer needs for one cycle, plus the last-known weather
//! that survives between cycles.

use alloc::string::String;
use alloc::vec::Vec;

use chrono::{Duration, NaiveDateTime};
use inkstation_display::Bitmap;
use serde::{Deserialize, Serialize};

use super::weather::{CurrentWeather, ForecastDay};
use crate::config::Units;

/// Content of the user block
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UserContent {
    /// Leave the block white
    #[default]
    Empty,
    /// Free text, fitted to the block
    Text(String),
    /// Pre-dithered image, centered in the block
    Image(Bitmap),
}

/// Input of one render pass
#[derive(Debug, Clone, PartialEq)]
pub struct DomainSnapshot<'a> {
    /// Cycle time, minute resolution is what the clock shows
    pub now: NaiveDateTime,
    pub current: Option<&'a CurrentWeather>,
    pub forecast: &'a [ForecastDay],
    pub user: &'a UserContent,
    pub units: Units,
}

/// Last successfully fetched weather
///
/// Persisted between invocations so a failed or skipped fetch can reuse the
/// previous values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherCache {
    pub current: Option<CurrentWeather>,
    pub current_fetched_at: Option<NaiveDateTime>,
    pub forecast: Vec<ForecastDay>,
    pub forecast_fetched_at: Option<NaiveDateTime>,
}

/// Minutes after which cached current conditions are refetched regardless of schedule
pub const CURRENT_EXPIRY_MINUTES: i64 = 60;

impl WeatherCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Store freshly fetched current conditions
    pub fn update_current(&mut self, current: CurrentWeather, fetched_at: NaiveDateTime) {
        self.current = Some(current);
        self.current_fetched_at = Some(fetched_at);
    }

    /// Store a freshly fetched forecast
    pub fn update_forecast(&mut self, forecast: Vec<ForecastDay>, fetched_at: NaiveDateTime) {
        self.forecast = forecast;
        self.forecast_fetched_at = Some(fetched_at);
    }

    /// Check if current conditions are missing or older than `CURRENT_EXPIRY_MINUTES`
    pub fn current_expired(&self, now: NaiveDateTime) -> bool {
        match (&self.current, self.current_fetched_at) {
            (Some(_), Some(at)) => now - at >= Duration::minutes(CURRENT_EXPIRY_MINUTES),
            _ => true,
        }
    }

    /// Check if the forecast is missing or was fetched on an earlier day
    pub fn forecast_expired(&self, now: NaiveDateTime) -> bool {
        match self.forecast_fetched_at {
            Some(at) if !self.forecast.is_empty() => at.date() < now.date(),
            _ => true,
        }
    }

    /// Snapshot for rendering at `now`
    pub fn snapshot<'a>(
        &'a self,
        now: NaiveDateTime,
        user: &'a UserContent,
        units: Units,
    ) -> DomainSnapshot<'a> {
        DomainSnapshot {
            now,
            current: self.current.as_ref(),
            forecast: &self.forecast,
            user,
            units,
        }
    }
}
