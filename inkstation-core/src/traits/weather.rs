//! Weather provider trait

use alloc::string::String;
use alloc::vec::Vec;

use thiserror::Error;

use crate::config::LocationConfig;
use crate::domain::{CurrentWeather, ForecastDay};

/// Errors a weather provider can report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Provider could not be reached or had no data
    #[error("weather provider unavailable: {0}")]
    Unavailable(String),
    /// Provider answered with data that does not parse
    #[error("malformed weather data: {0}")]
    Malformed(String),
    /// Provider did not answer in time
    #[error("weather provider timed out")]
    Timeout,
}

/// Source of current conditions and forecasts
///
/// Implementations own transport, authentication and unit conversion.
/// Temperatures are returned in the configured units.
pub trait WeatherProvider {
    /// Fetch current conditions at `location`
    fn get_current(&mut self, location: &LocationConfig) -> Result<CurrentWeather, FetchError>;

    /// Fetch the daily forecast at `location`, earliest day first
    fn get_forecast(&mut self, location: &LocationConfig) -> Result<Vec<ForecastDay>, FetchError>;
}

impl<T: WeatherProvider + ?Sized> WeatherProvider for &mut T {
    fn get_current(&mut self, location: &LocationConfig) -> Result<CurrentWeather, FetchError> {
        (**self).get_current(location)
    }

    fn get_forecast(&mut self, location: &LocationConfig) -> Result<Vec<ForecastDay>, FetchError> {
        (**self).get_forecast(location)
    }
}
