use std::fs::{File, OpenOptions, TryLockError};
use std::path::Path;

/// Held for the whole run; dropping it releases the lock.
pub struct RunLock {
    _file: File,
}

pub const ALREADY_RUNNING: &str = "Another instance is running. Exiting.";

/// Take an exclusive lock on `path` without waiting. Fails with
/// `ALREADY_RUNNING` when another process holds it.
pub fn acquire(path: &Path) -> Result<RunLock, String> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)
        .map_err(|e| format!("Cannot open lock file {}: {}", path.display(), e))?;
    match file.try_lock() {
        Ok(()) => Ok(RunLock { _file: file }),
        Err(TryLockError::WouldBlock) => Err(ALREADY_RUNNING.to_string()),
        Err(TryLockError::Error(e)) => Err(format!("Cannot lock {}: {}", path.display(), e)),
    }
}
