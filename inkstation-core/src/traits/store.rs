//! Persistent state storage
//!
//! Provides a small key-value interface for the state that must survive
//! between invocations. The host decides where the bytes live.

use alloc::vec::Vec;

use crate::cache::CacheStoreError;

/// Storage keys for persisted state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StorageKey {
    /// Region cache table
    RegionCache = 0,
    /// Last-known weather
    WeatherSnapshot = 1,
}

impl StorageKey {
    /// Every key
    pub const ALL: [StorageKey; 2] = [StorageKey::RegionCache, StorageKey::WeatherSnapshot];

    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a key from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(StorageKey::RegionCache),
            1 => Some(StorageKey::WeatherSnapshot),
            _ => None,
        }
    }

    /// Stable name, usable as a file stem
    pub const fn name(self) -> &'static str {
        match self {
            StorageKey::RegionCache => "region-cache",
            StorageKey::WeatherSnapshot => "weather",
        }
    }
}

/// Key-value state storage
///
/// Implementations should make `write` atomic: a reader sees either the
/// old value or the new one, never a mix.
pub trait StateStore {
    /// Read the value for `key`, or `None` if nothing was stored
    fn read(&mut self, key: StorageKey) -> Result<Option<Vec<u8>>, CacheStoreError>;

    /// Replace the value for `key`
    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), CacheStoreError>;
}

impl<T: StateStore + ?Sized> StateStore for &mut T {
    fn read(&mut self, key: StorageKey) -> Result<Option<Vec<u8>>, CacheStoreError> {
        (**self).read(key)
    }

    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), CacheStoreError> {
        (**self).write(key, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bytes() {
        for key in StorageKey::ALL {
            assert_eq!(StorageKey::from_u8(key.as_u8()), Some(key));
        }
        assert_eq!(StorageKey::from_u8(9), None);
    }
}
