//! Advisory exclusive lock on `<history-path>.lock`, held for the
//! lifetime of the process (§5 "shared-resource policy"). Grounds the
//! teacher's daemon startup lock
//! (`daemon/src/lifecycle/startup.rs`'s `try_lock_exclusive` idiom),
//! generalized from a PID-file lock to a plain history-file lock: the
//! recovery tool has no daemon PID to record, just a held `File` whose
//! lock the OS releases on process exit by any path.

use std::fs::File;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use lrc_core::error::{RecoverError, Result};

pub struct HistoryLock {
    _file: File,
    path: PathBuf,
}

impl HistoryLock {
    /// Acquires the exclusive lock on `<history_path>.lock`, creating
    /// the lock file if absent. Fails with `ConfigInvalid` naming the
    /// lock path if another process already holds it.
    pub fn acquire(history_path: &Path) -> Result<Self> {
        let lock_path = lock_path_for(history_path);
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.try_lock_exclusive().map_err(|_| {
            RecoverError::ConfigInvalid(format!(
                "{} is already locked by another learner-recover process",
                lock_path.display()
            ))
        })?;

        tracing::info!(path = %lock_path.display(), "acquired history file lock");
        Ok(HistoryLock {
            _file: file,
            path: lock_path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn lock_path_for(history_path: &Path) -> PathBuf {
    let mut os_string = history_path.as_os_str().to_os_string();
    os_string.push(".lock");
    PathBuf::from(os_string)
}

#[cfg(test)]
#[path = "history_lock_tests.rs"]
mod tests;
