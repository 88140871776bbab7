//! Region cache and persisted records

pub mod record;
pub mod region;

pub use record::{decode, encode, CacheStoreError, Record, RECORD_VERSION};
pub use region::{CacheEntry, DirtyReason, DirtySet, RegionCache};

use crate::domain::WeatherCache;

impl Record for WeatherCache {
    const MAGIC: u32 = 0x494E_4B57; // "INKW"
}
