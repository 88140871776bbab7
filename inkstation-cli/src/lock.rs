//! Cycle lock
//!
//! Panel writes are slow next to a one-minute tick, so two invocations can
//! overlap. Each cycle holds an exclusive advisory lock on a file in the
//! state directory for its whole duration.

use std::fs::{File, OpenOptions, TryLockError};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::AppError;

/// Lock file name inside the state directory
pub const LOCK_FILE: &str = "inkstation.lock";

/// Held cycle lock; released on drop
#[derive(Debug)]
pub struct StationLock {
    // Lock lives as long as the open file
    _file: File,
    path: PathBuf,
}

impl StationLock {
    /// Take the lock without waiting
    ///
    /// Returns `Ok(None)` if another cycle holds it.
    pub fn try_acquire(state_dir: &Path) -> Result<Option<Self>, AppError> {
        let (file, path) = open(state_dir)?;
        match file.try_lock() {
            Ok(()) => {
                debug!("Took cycle lock {}", path.display());
                Ok(Some(Self { _file: file, path }))
            }
            Err(TryLockError::WouldBlock) => Ok(None),
            Err(TryLockError::Error(source)) => Err(AppError::Lock { path, source }),
        }
    }

    /// Take the lock, blocking until the holder releases it
    pub fn acquire(state_dir: &Path) -> Result<Self, AppError> {
        let (file, path) = open(state_dir)?;
        debug!("Waiting for cycle lock {}", path.display());
        match file.lock() {
            Ok(()) => Ok(Self { _file: file, path }),
            Err(source) => Err(AppError::Lock { path, source }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn open(state_dir: &Path) -> Result<(File, PathBuf), AppError> {
    let path = state_dir.join(LOCK_FILE);
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&path);
    match file {
        Ok(file) => Ok((file, path)),
        Err(source) => Err(AppError::Lock { path, source }),
    }
}
