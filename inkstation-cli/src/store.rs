//! File-backed state store
//!
//! Each storage key is one file in the state directory. Writes go to a
//! temporary file that is renamed over the old one, so an interrupted
//! write leaves the previous record intact.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::trace;

use inkstation_core::cache::CacheStoreError;
use inkstation_core::traits::{StateStore, StorageKey};

/// State store keeping one file per key in a directory
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    /// Use `dir`, which must already exist
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File holding `key`
    pub fn path(&self, key: StorageKey) -> PathBuf {
        self.dir.join(format!("{}.bin", key.name()))
    }
}

impl StateStore for FileStateStore {
    fn read(&mut self, key: StorageKey) -> Result<Option<Vec<u8>>, CacheStoreError> {
        let path = self.path(key);
        match fs::read(&path) {
            Ok(bytes) => {
                trace!("Read {} bytes from {}", bytes.len(), path.display());
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), CacheStoreError> {
        let path = self.path(key);
        write_atomic(&path, data).map_err(|e| io_error(&path, e))?;
        trace!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }
}

/// Replace `path` with `data` via a sibling temporary file
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut file = fs::File::create(&tmp)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);
    fs::rename(&tmp, path)
}

fn io_error(path: &Path, e: io::Error) -> CacheStoreError {
    CacheStoreError::Io(format!("{}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::scratch_dir;
    use chrono::NaiveDate;
    use inkstation_core::cache::{encode, RegionCache};
    use inkstation_core::layout::RegionName;
    use inkstation_core::{ContentHash, RefreshMode};

    #[test]
    fn test_missing_key_reads_none() {
        let dir = scratch_dir("store-missing");
        let mut store = FileStateStore::new(&dir);
        assert_eq!(store.read(StorageKey::RegionCache), Ok(None));
    }

    #[test]
    fn test_write_then_read() {
        let dir = scratch_dir("store-roundtrip");
        let mut store = FileStateStore::new(&dir);

        store.write(StorageKey::RegionCache, b"first").unwrap();
        store.write(StorageKey::RegionCache, b"second").unwrap();
        store.write(StorageKey::WeatherSnapshot, b"weather").unwrap();

        assert_eq!(
            store.read(StorageKey::RegionCache).unwrap().as_deref(),
            Some(&b"second"[..])
        );
        assert_eq!(
            store.read(StorageKey::WeatherSnapshot).unwrap().as_deref(),
            Some(&b"weather"[..])
        );
        assert!(!dir.join("region-cache.bin.tmp").exists());
    }

    #[test]
    fn test_cache_record_survives_reopen() {
        let dir = scratch_dir("store-reopen");
        let at = NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();

        let mut cache = RegionCache::new(ContentHash(7));
        cache.begin_cycle();
        cache.commit(RegionName::Clock, ContentHash(1), at, RefreshMode::Full);

        FileStateStore::new(&dir)
            .write(StorageKey::RegionCache, &encode(&cache).unwrap())
            .unwrap();

        let bytes = FileStateStore::new(&dir)
            .read(StorageKey::RegionCache)
            .unwrap()
            .unwrap();
        let restored: RegionCache = inkstation_core::cache::decode(&bytes).unwrap();
        assert_eq!(restored, cache);
    }

    #[test]
    fn test_corrupt_file_is_rejected_by_decode() {
        let dir = scratch_dir("store-corrupt");
        fs::write(dir.join("region-cache.bin"), b"not a record at all").unwrap();

        let bytes = FileStateStore::new(&dir)
            .read(StorageKey::RegionCache)
            .unwrap()
            .unwrap();
        assert!(inkstation_core::cache::decode::<RegionCache>(&bytes).is_err());
    }

    #[test]
    fn test_unwritable_dir_is_io_error() {
        let dir = scratch_dir("store-unwritable").join("missing");
        let mut store = FileStateStore::new(&dir);
        assert!(matches!(
            store.write(StorageKey::RegionCache, b"x"),
            Err(CacheStoreError::Io(_))
        ));
    }
}
