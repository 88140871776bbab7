//! State carried between cycles

use log::{info, warn};

use crate::cache::{decode, encode, CacheStoreError, Record, RegionCache};
use crate::domain::WeatherCache;
use crate::layout::Layout;
use crate::traits::{StateStore, StorageKey};

/// Everything one cycle hands to the next
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StationState {
    pub cache: RegionCache,
    pub weather: WeatherCache,
}

impl StationState {
    /// Empty state for a layout: every region dirty, no weather
    pub fn cold(layout: &Layout) -> Self {
        Self {
            cache: RegionCache::new(layout.fingerprint()),
            weather: WeatherCache::new(),
        }
    }

    /// Load state from `store`
    ///
    /// Missing or unreadable records are not errors: the region cache starts
    /// cold and the weather cache starts empty.
    pub fn load<S: StateStore + ?Sized>(store: &mut S, layout: &Layout) -> Self {
        let fingerprint = layout.fingerprint();

        let cache = match read_record::<RegionCache, S>(store, StorageKey::RegionCache) {
            Ok(Some(cache)) => cache.for_layout(fingerprint),
            Ok(None) => {
                info!("No region cache stored, all regions dirty");
                RegionCache::new(fingerprint)
            }
            Err(e) => {
                warn!("Region cache unusable ({}), all regions dirty", e);
                RegionCache::new(fingerprint)
            }
        };

        let weather = match read_record::<WeatherCache, S>(store, StorageKey::WeatherSnapshot) {
            Ok(Some(weather)) => weather,
            Ok(None) => WeatherCache::new(),
            Err(e) => {
                warn!("Weather cache unusable ({}), refetching", e);
                WeatherCache::new()
            }
        };

        Self { cache, weather }
    }

    /// Write state to `store`
    pub fn save<S: StateStore + ?Sized>(&self, store: &mut S) -> Result<(), CacheStoreError> {
        store.write(StorageKey::RegionCache, &encode(&self.cache)?)?;
        store.write(StorageKey::WeatherSnapshot, &encode(&self.weather)?)?;
        Ok(())
    }
}

fn read_record<T: Record, S: StateStore + ?Sized>(
    store: &mut S,
    key: StorageKey,
) -> Result<Option<T>, CacheStoreError> {
    match store.read(key)? {
        Some(bytes) => decode(&bytes).map(Some),
        None => Ok(None),
    }
}
