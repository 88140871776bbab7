//! Wall clock

use chrono::{Local, NaiveDateTime, Timelike};

use inkstation_core::traits::Clock;

use crate::error::AppError;

/// Local system time, truncated to the minute
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        let now = Local::now().naive_local();
        now.with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(now)
    }
}

/// Parse a `--now` value
///
/// Accepts `YYYY-MM-DDTHH:MM`, with optional seconds.
pub fn parse_now(value: &str) -> Result<NaiveDateTime, AppError> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| AppError::InvalidNow(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_now() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(10, 5, 0)
            .unwrap();
        assert_eq!(parse_now("2024-06-03T10:05").unwrap(), expected);
        assert_eq!(parse_now("2024-06-03T10:05:00").unwrap(), expected);
        assert!(matches!(
            parse_now("10:05"),
            Err(AppError::InvalidNow(v)) if v == "10:05"
        ));
    }

    #[test]
    fn test_system_clock_whole_minutes() {
        let now = SystemClock.now();
        assert_eq!(now.second(), 0);
        assert_eq!(now.nanosecond(), 0);
    }
}
