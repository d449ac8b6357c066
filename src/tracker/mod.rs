//! Project history tracking and derived activity metrics.
//!
//! The `Tracker` appends one [`HistorySnapshot`] per project per scan to an
//! append-only store and derives inactivity and velocity views on read.
//! History is never reordered, merged, or pruned; unbounded growth is an
//! accepted property of the log, and every derived view is recomputed from
//! it on demand.

/// Append-only per-project history storage.
pub mod store;

/// Velocity and trend derivation.
pub mod velocity;

pub use store::{HistorySnapshot, HistoryStore, TrackedProject};
pub use velocity::{Trend, VelocityView};

use crate::scanner::{DirStats, ProjectRecord};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Facade over the history store and the velocity engine.
#[derive(Debug, Clone)]
pub struct Tracker {
    /// Backing history store.
    store: HistoryStore,

    /// Trailing window, in days, for velocity derivation.
    window_days: u32,
}

/// Summary row for one tracked project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    /// Canonical project path.
    pub path: PathBuf,

    /// Display name.
    pub name: String,

    /// Timestamp of the most recent snapshot.
    pub last_activity: DateTime<Utc>,

    /// Whole days since the most recent snapshot.
    pub inactivity_days: i64,

    /// Derived velocity view.
    pub velocity: VelocityView,

    /// Statistics from the most recent snapshot.
    pub stats: DirStats,
}

impl Tracker {
    /// Creates a tracker rooted at the given data directory.
    #[must_use]
    pub fn new(data_dir: PathBuf, window_days: u32) -> Self {
        Self {
            store: HistoryStore::new(&data_dir),
            window_days,
        }
    }

    /// Unconditionally appends one snapshot for a scanned project.
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be persisted.
    pub fn record(&self, project: &ProjectRecord) -> Result<()> {
        let snapshot = HistorySnapshot {
            timestamp: project.scanned_at,
            stats: project.stats.clone(),
            git: project.git.clone(),
        };
        debug!(project = %project.path.display(), "recording snapshot");
        self.store.append(&project.path, &project.name, &snapshot)
    }

    /// Loads a project's full history in append order.
    ///
    /// # Errors
    /// Returns an error if the history log exists but cannot be read.
    pub fn history(&self, path: &Path) -> Result<Vec<HistorySnapshot>> {
        self.store.load(path)
    }

    /// Derives the velocity view for a project over the configured window.
    ///
    /// # Errors
    /// Returns an error if the history log exists but cannot be read.
    pub fn velocity(&self, path: &Path) -> Result<VelocityView> {
        let history = self.store.load(path)?;
        let timestamps: Vec<DateTime<Utc>> = history.iter().map(|s| s.timestamp).collect();
        Ok(velocity::derive(&timestamps, Utc::now(), self.window_days))
    }

    /// Whole days since the most recent snapshot; `0` with no history.
    ///
    /// # Errors
    /// Returns an error if the history log exists but cannot be read.
    pub fn inactivity_days(&self, path: &Path) -> Result<i64> {
        let history = self.store.load(path)?;
        Ok(history
            .last()
            .map_or(0, |last| (Utc::now() - last.timestamp).num_days().max(0)))
    }

    /// Summarizes every tracked project with at least one snapshot, most
    /// recently active first.
    ///
    /// # Errors
    /// Returns an error if the store cannot be enumerated or a history log
    /// cannot be read.
    pub fn summary(&self) -> Result<Vec<ProjectSummary>> {
        let mut summaries = Vec::new();

        for project in self.store.projects()? {
            let history = self.store.load(&project.path)?;
            let Some(last) = history.last() else {
                continue;
            };

            let timestamps: Vec<DateTime<Utc>> = history.iter().map(|s| s.timestamp).collect();
            let now = Utc::now();

            summaries.push(ProjectSummary {
                path: project.path,
                name: project.name,
                last_activity: last.timestamp,
                inactivity_days: (now - last.timestamp).num_days().max(0),
                velocity: velocity::derive(&timestamps, now, self.window_days),
                stats: last.stats.clone(),
            });
        }

        summaries.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ProjectType;
    use chrono::Duration;
    use tempfile::TempDir;

    /// Record for a synthetic project scanned at `scanned_at`.
    fn record_at(path: &str, scanned_at: DateTime<Utc>) -> ProjectRecord {
        ProjectRecord {
            name: PathBuf::from(path)
                .file_name()
                .unwrap()
                .to_string_lossy()
                .to_string(),
            path: PathBuf::from(path),
            project_type: ProjectType::Rust,
            git: None,
            stats: DirStats {
                file_count: 3,
                total_size_bytes: 1024,
                last_modified_at: Some(scanned_at),
            },
            scanned_at,
        }
    }

    #[test]
    fn test_record_appends_in_order() {
        let temp = TempDir::new().unwrap();
        let tracker = Tracker::new(temp.path().to_path_buf(), 30);
        let path = Path::new("/w/app");

        let older = Utc::now() - Duration::days(3);
        let newer = Utc::now();
        tracker.record(&record_at("/w/app", older)).unwrap();
        tracker.record(&record_at("/w/app", newer)).unwrap();

        let history = tracker.history(path).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].timestamp, older);
        assert_eq!(history[1].timestamp, newer);
    }

    #[test]
    fn test_velocity_over_recorded_history() {
        let temp = TempDir::new().unwrap();
        let tracker = Tracker::new(temp.path().to_path_buf(), 30);

        // 10 snapshots on 10 distinct days inside the window.
        for days_ago in 1..=10 {
            let ts = Utc::now() - Duration::days(days_ago);
            tracker.record(&record_at("/w/app", ts)).unwrap();
        }

        let view = tracker.velocity(Path::new("/w/app")).unwrap();
        assert_eq!(view.active_days, 10);
        assert_eq!(view.trend, Trend::Stable);
    }

    #[test]
    fn test_velocity_unknown_without_history() {
        let temp = TempDir::new().unwrap();
        let tracker = Tracker::new(temp.path().to_path_buf(), 30);

        let view = tracker.velocity(Path::new("/w/ghost")).unwrap();
        assert_eq!(view.trend, Trend::Unknown);
        assert_eq!(view.active_days, 0);
    }

    #[test]
    fn test_inactivity_days() {
        let temp = TempDir::new().unwrap();
        let tracker = Tracker::new(temp.path().to_path_buf(), 30);

        assert_eq!(tracker.inactivity_days(Path::new("/w/ghost")).unwrap(), 0);

        let ts = Utc::now() - Duration::days(9);
        tracker.record(&record_at("/w/app", ts)).unwrap();
        assert_eq!(tracker.inactivity_days(Path::new("/w/app")).unwrap(), 9);
    }

    #[test]
    fn test_summary_sorted_most_recent_first() {
        let temp = TempDir::new().unwrap();
        let tracker = Tracker::new(temp.path().to_path_buf(), 30);

        tracker
            .record(&record_at("/w/old", Utc::now() - Duration::days(20)))
            .unwrap();
        tracker
            .record(&record_at("/w/fresh", Utc::now() - Duration::days(1)))
            .unwrap();

        let summaries = tracker.summary().unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name, "fresh");
        assert_eq!(summaries[1].name, "old");
        assert_eq!(summaries[0].inactivity_days, 1);
        assert_eq!(summaries[0].stats.file_count, 3);
    }
}
