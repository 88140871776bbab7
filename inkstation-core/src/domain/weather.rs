//! Weather records
//!
//! Shapes of the data returned by a weather provider.

use alloc::string::String;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Provider icon code, e.g. `"10d"`
pub type IconCode = heapless::String<8>;

/// Current conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Temperature in the configured units
    pub temp: f32,
    /// Human-readable condition, e.g. "light rain"
    pub condition: String,
    /// Provider icon code
    pub icon: IconCode,
    /// Observation time reported by the provider
    pub timestamp: NaiveDateTime,
}

/// One day of forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub temp_high: f32,
    pub temp_low: f32,
    pub condition: String,
    pub icon: IconCode,
}

/// Glyph drawn for a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherIcon {
    Clear,
    PartlyCloudy,
    Cloudy,
    Rain,
    Thunderstorm,
    Snow,
    Mist,
    Unknown,
}

impl WeatherIcon {
    /// Map an OpenWeather-style icon code (`01d`, `10n`, ...) to a glyph
    ///
    /// The day/night suffix is ignored.
    pub fn from_code(code: &str) -> Self {
        match code.get(..2) {
            Some("01") => WeatherIcon::Clear,
            Some("02") => WeatherIcon::PartlyCloudy,
            Some("03") | Some("04") => WeatherIcon::Cloudy,
            Some("09") | Some("10") => WeatherIcon::Rain,
            Some("11") => WeatherIcon::Thunderstorm,
            Some("13") => WeatherIcon::Snow,
            Some("50") => WeatherIcon::Mist,
            _ => WeatherIcon::Unknown,
        }
    }
}

/// Build an icon code, truncating anything longer than the code capacity
pub fn icon_code(code: &str) -> IconCode {
    let mut out = IconCode::new();
    for c in code.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
