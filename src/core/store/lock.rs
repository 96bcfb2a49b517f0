//! Exclusive writer lock for a store file.
//!
//! The lock is a sibling file created with create-new semantics. Whoever
//! creates it owns the store until the guard is dropped.

use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

use tracing::{debug, warn};

use crate::core::error::StoreError;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub struct StoreLock {
    path: PathBuf,
}

impl StoreLock {
    /// Lock file guarding `store_path`.
    pub fn path_for(store_path: &Path) -> PathBuf {
        let mut name = store_path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Wait up to `timeout` for the lock on `store_path`.
    pub fn acquire(store_path: &Path, timeout: Duration) -> Result<Self, StoreError> {
        let path = Self::path_for(store_path);
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        }

        let started = Instant::now();
        loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    // Holder pid, for whoever finds a stale lock.
                    let _ = writeln!(file, "{}", std::process::id());
                    debug!(lock = %path.display(), "acquired store lock");
                    return Ok(Self { path });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if started.elapsed() >= timeout {
                        return Err(StoreError::LockTimeout {
                            path,
                            waited_secs: timeout.as_secs(),
                        });
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => return Err(StoreError::io(path, e)),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(lock = %self.path.display(), error = %e, "failed to remove store lock");
        }
    }
}
