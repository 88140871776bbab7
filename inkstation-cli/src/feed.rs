//! JSON weather feed
//!
//! A separate fetcher (cron job, systemd timer, or anything else that can
//! talk to a weather API) drops `current.json` and `forecast.json` into a
//! feed directory. This provider reads them on demand, so the station
//! itself never touches the network.
//!
//! ```json
//! { "temp": 21.4, "condition": "light rain", "icon": "10d",
//!   "timestamp": "2024-06-03T09:50:00" }
//! ```
//!
//! `forecast.json` is an array of
//! `{ "date", "temp_high", "temp_low", "condition", "icon" }`, earliest day
//! first.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use inkstation_core::config::LocationConfig;
use inkstation_core::domain::{icon_code, CurrentWeather, ForecastDay};
use inkstation_core::traits::{FetchError, WeatherProvider};

/// File holding current conditions
pub const CURRENT_FILE: &str = "current.json";
/// File holding the daily forecast
pub const FORECAST_FILE: &str = "forecast.json";

#[derive(Debug, Deserialize)]
struct CurrentRecord {
    temp: f32,
    condition: String,
    icon: String,
    timestamp: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
struct ForecastRecord {
    date: NaiveDate,
    temp_high: f32,
    temp_low: f32,
    condition: String,
    icon: String,
}

/// Weather provider reading JSON files from a directory
#[derive(Debug, Clone)]
pub struct FeedProvider {
    dir: PathBuf,
}

impl FeedProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<T, FetchError> {
        let path = self.dir.join(name);
        let text = fs::read_to_string(&path).map_err(|e| read_error(&path, e))?;
        debug!("Read {} bytes from {}", text.len(), path.display());
        serde_json::from_str(&text)
            .map_err(|e| FetchError::Malformed(format!("{}: {}", path.display(), e)))
    }
}

impl WeatherProvider for FeedProvider {
    // The fetcher has already chosen the location; the feed is only
    // ever for one place.
    fn get_current(&mut self, _location: &LocationConfig) -> Result<CurrentWeather, FetchError> {
        let record: CurrentRecord = self.load(CURRENT_FILE)?;
        Ok(CurrentWeather {
            temp: record.temp,
            condition: record.condition,
            icon: icon_code(&record.icon),
            timestamp: record.timestamp,
        })
    }

    fn get_forecast(&mut self, _location: &LocationConfig) -> Result<Vec<ForecastDay>, FetchError> {
        let mut records: Vec<ForecastRecord> = self.load(FORECAST_FILE)?;
        records.sort_by_key(|r| r.date);
        Ok(records
            .into_iter()
            .map(|r| ForecastDay {
                date: r.date,
                temp_high: r.temp_high,
                temp_low: r.temp_low,
                condition: r.condition,
                icon: icon_code(&r.icon),
            })
            .collect())
    }
}

fn read_error(path: &Path, e: io::Error) -> FetchError {
    match e.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => FetchError::Timeout,
        _ => FetchError::Unavailable(format!("{}: {}", path.display(), e)),
    }
}
