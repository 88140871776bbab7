//! Time source

use chrono::NaiveDateTime;

/// Wall-clock source
///
/// The update cycle only ever sees the time it is handed; hosts pick the
/// clock.
pub trait Clock {
    /// Current local time
    fn now(&self) -> NaiveDateTime;
}

/// Clock that always reports the same instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
