//! Single-writer lock for DuckDB database files.
//!
//! An open connection holds an exclusive `fs2` lock on `<db>.lock` and
//! records its owner in `<db>.lock.json`, so a second opener can say who
//! is in the way. Locks are per open file handle: two connectors in the
//! same process contend like two processes would.

use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum LockError {
    #[error("Database {} is in use{}", .path.display(), holder_suffix(.holder))]
    Busy { path: PathBuf, holder: Option<u32> },

    #[error("Cannot lock database {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn holder_suffix(holder: &Option<u32>) -> String {
    holder
        .map(|pid| format!(" by process {}", pid))
        .unwrap_or_default()
}

/// Who holds a lock, as written next to the lock file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockOwner {
    pub pid: u32,
    pub exe: Option<String>,
    pub acquired_at: String,
}

impl LockOwner {
    fn current() -> Self {
        Self {
            pid: std::process::id(),
            exe: std::env::current_exe()
                .ok()
                .map(|p| p.display().to_string()),
            acquired_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Held lock; released (and the owner file removed) on drop.
pub struct DbLock {
    _file: File,
    path: PathBuf,
    owner_path: Option<PathBuf>,
}

impl DbLock {
    /// Take the lock for `db_path` without waiting.
    pub fn acquire(db_path: &Path) -> Result<Self, LockError> {
        let path = lock_file_for(db_path);
        let io_err = |source| LockError::Io {
            path: db_path.to_path_buf(),
            source,
        };

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(io_err)?;

        // std's File::try_lock_exclusive shadows this on newer toolchains
        if let Err(e) = FileExt::try_lock_exclusive(&file) {
            if e.kind() != io::ErrorKind::WouldBlock {
                return Err(io_err(e));
            }
            let holder = read_owner(&owner_file_for(&path)).map(|o| o.pid);
            debug!(path = %db_path.display(), ?holder, "Database lock busy");
            return Err(LockError::Busy {
                path: db_path.to_path_buf(),
                holder,
            });
        }

        let owner_path = write_owner(&path);
        debug!(lock = %path.display(), "Database lock acquired");
        Ok(Self {
            _file: file,
            path,
            owner_path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DbLock {
    fn drop(&mut self) {
        if let Some(owner) = self.owner_path.take() {
            let _ = fs::remove_file(owner);
        }
        debug!(lock = %self.path.display(), "Database lock released");
    }
}

impl std::fmt::Debug for DbLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DbLock").field(&self.path).finish()
    }
}

/// `exchange.duckdb` -> `exchange.duckdb.lock`, `exchange` -> `exchange.lock`
pub fn lock_file_for(db_path: &Path) -> PathBuf {
    let mut name = db_path.as_os_str().to_os_string();
    name.push(".lock");
    PathBuf::from(name)
}

fn owner_file_for(lock_path: &Path) -> PathBuf {
    let mut name = lock_path.as_os_str().to_os_string();
    name.push(".json");
    PathBuf::from(name)
}

fn write_owner(lock_path: &Path) -> Option<PathBuf> {
    let path = owner_file_for(lock_path);
    let written = serde_json::to_vec_pretty(&LockOwner::current())
        .map_err(io::Error::from)
        .and_then(|bytes| fs::write(&path, bytes));
    match written {
        Ok(()) => Some(path),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not record lock owner");
            None
        }
    }
}

fn read_owner(owner_path: &Path) -> Option<LockOwner> {
    let bytes = fs::read(owner_path).ok()?;
    serde_json::from_slice(&bytes).ok()
}
