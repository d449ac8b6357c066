//! Directory statistics collection.
//!
//! Aggregates file count, total size, and freshest modification time over a
//! project's whole subtree. Unlike the outer project walker, this walk does
//! not stop at nested projects. A per-file metadata failure (permission,
//! race with deletion) excludes that file from the aggregate; a traversal
//! failure abandons that branch; neither aborts collection.

use crate::utils::matches_any;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use walkdir::WalkDir;

/// Aggregate statistics of a project directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DirStats {
    /// Number of files counted.
    pub file_count: u64,

    /// Sum of file sizes in bytes.
    pub total_size_bytes: u64,

    /// Most recent modification time seen, if any file was counted.
    pub last_modified_at: Option<DateTime<Utc>>,
}

/// Collects statistics for the subtree under `dir`.
///
/// Files whose path contains any of `exclude_patterns` as a substring are
/// skipped. Symbolic links are not followed.
#[must_use]
pub fn collect(dir: &Path, exclude_patterns: &[String]) -> DirStats {
    let mut stats = DirStats::default();

    for entry in WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        if matches_any(&entry.path().to_string_lossy(), exclude_patterns) {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            // Raced with deletion or unreadable; leave it out of the aggregate.
            continue;
        };

        stats.file_count += 1;
        stats.total_size_bytes += metadata.len();

        if let Ok(modified) = metadata.modified() {
            let mtime: DateTime<Utc> = modified.into();
            if stats.last_modified_at.is_none_or(|current| mtime > current) {
                stats.last_modified_at = Some(mtime);
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect_counts_and_sizes() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.rs"), b"12345").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/b.rs"), b"123").unwrap();

        let stats = collect(temp.path(), &[]);
        assert_eq!(stats.file_count, 2);
        assert_eq!(stats.total_size_bytes, 8);
        assert!(stats.last_modified_at.is_some());
    }

    #[test]
    fn test_collect_applies_exclude_patterns() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("main.rs"), b"fn main() {}").unwrap();
        let deps = temp.path().join("node_modules");
        fs::create_dir(&deps).unwrap();
        fs::write(deps.join("big.js"), b"excluded").unwrap();

        let stats = collect(temp.path(), &["node_modules".to_string()]);
        assert_eq!(stats.file_count, 1);
        assert_eq!(stats.total_size_bytes, 12);
    }

    #[test]
    fn test_collect_empty_directory() {
        let temp = TempDir::new().unwrap();

        let stats = collect(temp.path(), &[]);
        assert_eq!(stats, DirStats::default());
    }

    #[test]
    fn test_collect_missing_directory() {
        let temp = TempDir::new().unwrap();
        let gone = temp.path().join("nonexistent");

        // Traversal error is absorbed, not surfaced.
        let stats = collect(&gone, &[]);
        assert_eq!(stats, DirStats::default());
    }

    #[test]
    fn test_collect_tracks_freshest_mtime() {
        let temp = TempDir::new().unwrap();
        let old = temp.path().join("old.txt");
        let new = temp.path().join("new.txt");
        fs::write(&old, b"old").unwrap();
        fs::write(&new, b"new").unwrap();

        let past = filetime::FileTime::from_unix_time(1_000_000_000, 0);
        filetime::set_file_mtime(&old, past).unwrap();

        let stats = collect(temp.path(), &[]);
        let last = stats.last_modified_at.unwrap();
        let new_mtime: DateTime<Utc> = fs::metadata(&new).unwrap().modified().unwrap().into();
        assert_eq!(last, new_mtime);
    }

    #[test]
    fn test_collect_does_not_follow_symlinks() {
        #[cfg(unix)]
        {
            let temp = TempDir::new().unwrap();
            let real = temp.path().join("real");
            fs::create_dir(&real).unwrap();
            fs::write(real.join("file.txt"), b"data").unwrap();
            std::os::unix::fs::symlink(&real, temp.path().join("alias")).unwrap();

            let stats = collect(temp.path(), &[]);
            // Counted once through "real", not again through "alias".
            assert_eq!(stats.file_count, 1);
        }
    }
}
