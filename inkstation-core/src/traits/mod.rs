//! Collaborator traits
//!
//! These traits define the interface between the station logic and the
//! host: where weather comes from, where state is kept and what time it is.
//! The panel interface lives in `inkstation-display`.

pub mod clock;
pub mod store;
pub mod weather;

pub use clock::{Clock, FixedClock};
pub use store::{StateStore, StorageKey};
pub use weather::{FetchError, WeatherProvider};
