//! Domain data
//!
//! Weather records, user block content and the snapshot handed to the renderer.

pub mod snapshot;
pub mod weather;

pub use snapshot::{DomainSnapshot, UserContent, WeatherCache, CURRENT_EXPIRY_MINUTES};
pub use weather::{icon_code, CurrentWeather, ForecastDay, IconCode, WeatherIcon};
