//! Project discovery.
//!
//! The `Scanner` walks the configured watch roots looking for directories
//! that classify as projects, collecting a [`ProjectRecord`] for each. The
//! walk is bounded (configurable depth), cycle-safe (a visited set keyed by
//! symlink-resolved canonical paths), and fault-tolerant: an unreadable
//! directory abandons that subtree and the walk continues. Classified
//! projects are leaves of the walk regardless of remaining depth budget, so
//! no record's path is ever nested inside another record's path.

/// Project type classification from indicator files.
pub mod classify;

/// Directory statistics aggregation.
pub mod stats;

pub use classify::ProjectType;
pub use stats::DirStats;

use crate::config::Config;
use crate::git::{self, GitSnapshot};
use crate::utils::{expand_tilde, matches_any};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// One discovered project, rebuilt fresh on every scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Directory name of the project.
    pub name: String,

    /// Canonical (symlink-resolved) absolute path; the project's identity.
    pub path: PathBuf,

    /// Classified project type.
    pub project_type: ProjectType,

    /// Best-effort git state, `None` when unavailable.
    pub git: Option<GitSnapshot>,

    /// Aggregate file statistics for the project subtree.
    pub stats: DirStats,

    /// When this record was produced.
    pub scanned_at: DateTime<Utc>,
}

/// Walks watch roots and discovers projects.
#[derive(Debug, Clone)]
pub struct Scanner {
    /// Roots under which projects are discovered.
    watch_paths: Vec<PathBuf>,

    /// Substring patterns pruning directories and excluding files from stats.
    exclude_patterns: Vec<String>,

    /// Maximum recursion depth (0 = immediate children of a root only).
    max_depth: usize,

    /// Whether to recurse below the immediate children of each root.
    recursive: bool,
}

impl Scanner {
    /// Creates a scanner with an explicit policy.
    #[must_use]
    pub const fn new(
        watch_paths: Vec<PathBuf>,
        exclude_patterns: Vec<String>,
        max_depth: usize,
        recursive: bool,
    ) -> Self {
        Self {
            watch_paths,
            exclude_patterns,
            max_depth,
            recursive,
        }
    }

    /// Creates a scanner from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.scan.watch_paths.clone(),
            config.scan.exclude_patterns.clone(),
            config.scan.max_depth,
            config.scan.recursive,
        )
    }

    /// Scans all watch roots and returns the discovered projects.
    ///
    /// Never fails for environmental reasons: missing roots, unreadable
    /// directories, and broken symlinks are skipped, and the result may
    /// legitimately be empty. Roots are scanned in parallel; one visited set
    /// of canonical paths shared across roots guarantees each directory is
    /// visited at most once per scan even across symlink aliases.
    #[must_use]
    pub fn scan(&self) -> Vec<ProjectRecord> {
        let visited: Mutex<HashSet<PathBuf>> = Mutex::new(HashSet::new());

        let records: Vec<ProjectRecord> = self
            .watch_paths
            .par_iter()
            .map(|root| {
                let mut found = Vec::new();
                match self.resolve_root(root) {
                    Some(root) => self.walk_children(&root, 0, &visited, &mut found),
                    None => debug!(root = %root.display(), "watch root missing, skipping"),
                }
                found
            })
            .flatten()
            .collect();

        prune_nested(records)
    }

    /// Expands and validates a configured watch root.
    fn resolve_root(&self, root: &Path) -> Option<PathBuf> {
        let expanded = expand_tilde(&root.to_string_lossy()).ok()?;
        expanded.is_dir().then_some(expanded)
    }

    /// Enumerates the child directories of `dir` at the given depth.
    ///
    /// A listing failure (permission, OS error) abandons this subtree.
    fn walk_children(
        &self,
        dir: &Path,
        depth: usize,
        visited: &Mutex<HashSet<PathBuf>>,
        out: &mut Vec<ProjectRecord>,
    ) {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(dir = %dir.display(), %err, "cannot list directory, abandoning subtree");
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            // is_dir() traverses symlinks deliberately: aliased directories
            // are walked too, with the visited set preventing revisits.
            if path.is_dir() {
                self.visit(&path, depth, visited, out);
            }
        }
    }

    /// Visits one directory node: exclude check, cycle check, classification,
    /// and either record construction or recursion.
    fn visit(
        &self,
        dir: &Path,
        depth: usize,
        visited: &Mutex<HashSet<PathBuf>>,
        out: &mut Vec<ProjectRecord>,
    ) {
        let Some(name) = dir.file_name().map(|n| n.to_string_lossy().to_string()) else {
            return;
        };
        if matches_any(&name, &self.exclude_patterns) {
            debug!(dir = %dir.display(), "excluded by pattern");
            return;
        }

        // Canonicalize for identity; a broken symlink or unreadable parent
        // simply drops this node.
        let Ok(canonical) = dir.canonicalize() else {
            return;
        };
        {
            let mut guard = visited
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if !guard.insert(canonical.clone()) {
                debug!(dir = %canonical.display(), "already visited, skipping");
                return;
            }
        }

        if let Some(project_type) = classify::classify(dir) {
            out.push(self.build_record(name, canonical, project_type));
            // Projects are leaves of the walk; never descend into them here.
            return;
        }

        if self.recursive && depth < self.max_depth {
            self.walk_children(dir, depth + 1, visited, out);
        }
    }

    /// Builds the full record for a classified project directory.
    fn build_record(
        &self,
        name: String,
        canonical: PathBuf,
        project_type: ProjectType,
    ) -> ProjectRecord {
        debug!(project = %canonical.display(), %project_type, "discovered project");
        let stats = stats::collect(&canonical, &self.exclude_patterns);
        let git = git::extract_state(&canonical);

        ProjectRecord {
            name,
            path: canonical,
            project_type,
            git,
            stats,
            scanned_at: Utc::now(),
        }
    }
}

/// Drops records whose canonical path is a strict descendant of another
/// record's path. Within a single root the leaf rule already guarantees
/// this; overlapping watch roots can still produce nesting.
fn prune_nested(mut records: Vec<ProjectRecord>) -> Vec<ProjectRecord> {
    records.sort_by(|a, b| a.path.cmp(&b.path));

    let mut kept: Vec<ProjectRecord> = Vec::new();
    for record in records {
        // Sorting by components keeps descendants contiguous after their
        // ancestor, so checking the last kept record suffices.
        let nested = kept
            .last()
            .is_some_and(|prev| record.path != prev.path && record.path.starts_with(&prev.path));
        if !nested {
            kept.push(record);
        }
    }
    kept
}
