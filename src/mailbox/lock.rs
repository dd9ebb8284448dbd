//! Per-mailbox advisory file locking.
//!
//! Every load-mutate-save on a mailbox file, and every archive batch
//! merge, runs under the lock for that file. Distinct agents use
//! distinct files and never contend.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// A lock older than this is considered abandoned and reclaimed.
const LOCK_STALE_MS: u64 = 5000;

/// How long a caller waits for a contended lock before giving up.
const LOCK_WAIT_MS: u64 = 2000;

/// Poll interval while waiting on a contended lock.
const LOCK_POLL_MS: u64 = 25;

/// Acquire an exclusive lock on a file, waiting briefly if contended.
///
/// Concurrent callers targeting the same mailbox serialize here; the
/// wait is bounded so an operation never hangs on a dead peer.
pub fn acquire_lock(path: &Path) -> Result<LockHandle> {
    let lock_path = PathBuf::from(format!("{}.lock", path.display()));
    let deadline = Instant::now() + Duration::from_millis(LOCK_WAIT_MS);

    loop {
        match try_acquire(&lock_path) {
            Ok(handle) => return Ok(handle),
            Err(e) => {
                if Instant::now() >= deadline {
                    return Err(e);
                }
                std::thread::sleep(Duration::from_millis(LOCK_POLL_MS));
            }
        }
    }
}

fn try_acquire(lock_path: &Path) -> Result<LockHandle> {
    if lock_path.exists() {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        let held_ms = lock_path
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(|m| m.duration_since(UNIX_EPOCH).ok())
            .map(|d| now_ms.saturating_sub(d.as_millis() as u64))
            .unwrap_or(u64::MAX);

        if held_ms < LOCK_STALE_MS {
            return Err(Error::Mailbox(format!(
                "Lock file is held: {}",
                lock_path.display()
            )));
        }

        // Stale lock, remove it
        tracing::warn!("Removing stale lock: {}", lock_path.display());
        std::fs::remove_file(lock_path).ok();
    }

    let mut lock_file = File::create(lock_path)?;
    lock_file.write_all(format!("{}\n", std::process::id()).as_bytes())?;
    lock_file.sync_all()?;

    tracing::trace!("Acquired lock: {}", lock_path.display());

    Ok(LockHandle {
        lock_path: lock_path.to_path_buf(),
    })
}

/// Lock handle - releases lock when dropped.
pub struct LockHandle {
    lock_path: PathBuf,
}

impl Drop for LockHandle {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.lock_path) {
            tracing::warn!("Failed to release lock {}: {}", self.lock_path.display(), e);
        } else {
            tracing::trace!("Released lock: {}", self.lock_path.display());
        }
    }
}

/// Acquire lock, execute function, release lock.
pub fn with_lock<T, F>(path: &Path, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let _lock = acquire_lock(path)?;
    f()
}
