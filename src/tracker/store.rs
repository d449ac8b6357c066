//! Append-only per-project history storage.
//!
//! Each project gets its own JSON-lines log under `<data_dir>/history/`,
//! named by the xxh3 hash of its canonical path, with a `.meta.json` sidecar
//! carrying the path and display name for enumeration. Appends are a single
//! write of one serialized line on a file opened in append mode, so a
//! snapshot is persisted whole or not at all and concurrent appends cannot
//! lose each other's lines.

use crate::HISTORY_DIR;
use crate::git::GitSnapshot;
use crate::scanner::DirStats;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_64;

/// One point-in-time record of a project's statistics and git state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Aggregate file statistics at that time.
    pub stats: DirStats,

    /// Git state at that time, if it could be extracted.
    pub git: Option<GitSnapshot>,
}

/// Identity sidecar of a tracked project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedProject {
    /// Canonical absolute path of the project.
    pub path: PathBuf,

    /// Display name (directory name at discovery time).
    pub name: String,
}

/// File-backed append-only history store.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    /// Directory holding the per-project log and sidecar files.
    history_dir: PathBuf,
}

impl HistoryStore {
    /// Creates a store rooted at the given data directory.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            history_dir: data_dir.join(HISTORY_DIR),
        }
    }

    /// Stable file key for a project path.
    fn key(path: &Path) -> String {
        format!("{:016x}", xxh3_64(path.as_os_str().as_encoded_bytes()))
    }

    /// Path of the history log for a project.
    fn log_path(&self, path: &Path) -> PathBuf {
        self.history_dir.join(format!("{}.jsonl", Self::key(path)))
    }

    /// Path of the identity sidecar for a project.
    fn meta_path(&self, path: &Path) -> PathBuf {
        self.history_dir
            .join(format!("{}.meta.json", Self::key(path)))
    }

    /// Appends one snapshot to a project's history.
    ///
    /// Never merges, deduplicates, or rewrites earlier entries. The sidecar
    /// is written on first append only.
    ///
    /// # Errors
    ///
    /// Returns an error if the history directory cannot be created or the
    /// log or sidecar cannot be written.
    pub fn append(&self, path: &Path, name: &str, snapshot: &HistorySnapshot) -> Result<()> {
        fs::create_dir_all(&self.history_dir).with_context(|| {
            format!(
                "Failed to create history directory: {}",
                self.history_dir.display()
            )
        })?;

        let meta_path = self.meta_path(path);
        if !meta_path.exists() {
            let meta = TrackedProject {
                path: path.to_path_buf(),
                name: name.to_string(),
            };
            fs::write(&meta_path, serde_json::to_vec_pretty(&meta)?)
                .with_context(|| format!("Failed to write {}", meta_path.display()))?;
        }

        let mut line = serde_json::to_string(snapshot)?;
        line.push('\n');

        let log_path = self.log_path(path);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open {}", log_path.display()))?;
        // One write call for the whole line: the snapshot lands whole or not
        // at all, even with concurrent appenders.
        file.write_all(line.as_bytes())
            .with_context(|| format!("Failed to append to {}", log_path.display()))?;

        Ok(())
    }

    /// Loads a project's full history in append order.
    ///
    /// A missing log file is an empty history.
    ///
    /// # Errors
    ///
    /// Returns an error naming the file and line when an entry cannot be
    /// parsed; a corrupt store fails fast rather than silently resetting.
    pub fn load(&self, path: &Path) -> Result<Vec<HistorySnapshot>> {
        let log_path = self.log_path(path);
        if !log_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&log_path)
            .with_context(|| format!("Failed to read {}", log_path.display()))?;

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).with_context(|| {
                    format!(
                        "Corrupt history entry at {}:{}",
                        log_path.display(),
                        index + 1
                    )
                })
            })
            .collect()
    }

    /// Enumerates all tracked projects from their sidecars.
    ///
    /// # Errors
    ///
    /// Returns an error if the history directory cannot be listed or a
    /// sidecar cannot be parsed.
    pub fn projects(&self) -> Result<Vec<TrackedProject>> {
        if !self.history_dir.exists() {
            return Ok(Vec::new());
        }

        let mut projects = Vec::new();
        for entry in fs::read_dir(&self.history_dir).with_context(|| {
            format!(
                "Failed to read history directory: {}",
                self.history_dir.display()
            )
        })? {
            let entry = entry?;
            let path = entry.path();
            if !path.to_string_lossy().ends_with(".meta.json") {
                continue;
            }
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let project: TrackedProject = serde_json::from_str(&content)
                .with_context(|| format!("Corrupt project sidecar: {}", path.display()))?;
            projects.push(project);
        }

        Ok(projects)
    }
}
