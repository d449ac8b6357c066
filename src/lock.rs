//! Scan locking to serialize concurrent scans against one data directory.
//!
//! Two overlapping scans cannot corrupt a history log (appends are atomic
//! whole lines), but serializing them keeps sidecar writes and per-scan
//! output coherent. The lock is a file under the data directory, held
//! exclusively for the duration of a scan and released on drop.

use anyhow::{Context, Result, bail};
use fs4::fs_std::FileExt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// Name of the lock file within the data directory.
const LOCK_FILE: &str = "scan.lock";

/// Locks older than this are assumed to be left over from a crashed process.
const STALE_THRESHOLD: Duration = Duration::from_secs(300);

/// Holds an exclusive lock on a data directory for the duration of a scan.
///
/// The lock is automatically released when this struct is dropped.
pub struct ScanLock {
    /// Lock file handle.
    lock_file: File,
    /// Path to the lock file (for error messages and cleanup).
    lock_path: PathBuf,
}

impl ScanLock {
    /// Acquire an exclusive scan lock for a data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The data directory cannot be created
    /// - Another scan holds the lock past the timeout period
    pub fn acquire(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir).context("Failed to create data directory")?;

        let lock_path = data_dir.join(LOCK_FILE);
        Self::cleanup_stale_lock(&lock_path);

        let lock_file = Self::try_acquire_lock(&lock_path)?;

        Ok(Self {
            lock_file,
            lock_path,
        })
    }

    /// Try to acquire the lock file, retrying until the timeout elapses.
    fn try_acquire_lock(lock_path: &Path) -> Result<File> {
        // Use shorter timeouts in test mode for faster test execution
        let lock_timeout = if cfg!(test) {
            Duration::from_millis(100)
        } else {
            Duration::from_secs(30)
        };
        let retry_interval = if cfg!(test) {
            Duration::from_millis(10)
        } else {
            Duration::from_millis(100)
        };

        let start = Instant::now();

        loop {
            let file = File::create(lock_path)
                .with_context(|| format!("Failed to create lock file: {}", lock_path.display()))?;

            match file.try_lock_exclusive() {
                Ok(true) => {
                    // Write holder info to the lock file for debugging
                    use std::io::Write;
                    let mut file_ref = &file;
                    let _ = writeln!(
                        file_ref,
                        "pid={}\ntime={}",
                        std::process::id(),
                        humantime::format_rfc3339(SystemTime::now())
                    );
                    return Ok(file);
                }
                Ok(false) | Err(_) if start.elapsed() < lock_timeout => {
                    // Lock held by another process, wait and retry
                    std::thread::sleep(retry_interval);
                }
                Ok(false) | Err(_) => {
                    bail!(
                        "Another scan is already in progress. Please wait for it \
                         to complete or remove stale lock at: {}",
                        lock_path.display()
                    );
                }
            }
        }
    }

    /// Remove a stale lock file left behind by a crashed process.
    fn cleanup_stale_lock(lock_path: &Path) {
        if let Ok(metadata) = fs::metadata(lock_path)
            && let Ok(modified) = metadata.modified()
            && let Ok(elapsed) = modified.elapsed()
            && elapsed > STALE_THRESHOLD
            && let Err(e) = fs::remove_file(lock_path)
        {
            eprintln!(
                "Warning: Failed to remove stale lock {}: {}",
                lock_path.display(),
                e
            );
        }
    }

    /// Release the lock explicitly (normally handled by Drop).
    ///
    /// # Errors
    ///
    /// Returns an error if the unlock operation fails due to I/O errors.
    pub fn release(self) -> Result<()> {
        self.lock_file.unlock()?;
        if let Err(e) = fs::remove_file(&self.lock_path) {
            eprintln!(
                "Warning: Failed to remove lock file {}: {}",
                self.lock_path.display(),
                e
            );
        }
        Ok(())
    }
}

impl Drop for ScanLock {
    fn drop(&mut self) {
        let _ = self.lock_file.unlock();

        if let Err(e) = fs::remove_file(&self.lock_path) {
            eprintln!(
                "Warning: Failed to remove lock file during cleanup {}: {}",
                self.lock_path.display(),
                e
            );
        }
    }
}
