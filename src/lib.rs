#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
// Allow pedantic strict lints that create false positives in this codebase
#![allow(clippy::arithmetic_side_effects)] // Simple counters and size calculations cannot overflow
#![allow(clippy::float_arithmetic)] // Required for velocity ratio calculations

//! # Lookout - Coding Project Discovery and Velocity Tracker
//!
//! Lookout discovers source-code projects under a set of watched directories,
//! snapshots each project's git state and file statistics, and derives
//! activity metrics (inactivity, active days, trend) from repeated snapshots
//! over time.
//!
//! ## Architecture
//!
//! The codebase is organized into several key modules:
//!
//! - [`scanner`]: Bounded, cycle-safe directory traversal and project classification
//! - [`git`]: Best-effort git state extraction through the git CLI
//! - [`tracker`]: Append-only per-project history and derived velocity views
//! - [`config`]: Configuration parsing and management
//! - [`commands`]: CLI command implementations (scan, status, show, ...)
//! - [`utils`]: Utility functions and helpers
//!
//! ## Example Usage
//!
//! ```no_run
//! use lookout::LookoutContext;
//! use lookout::scanner::Scanner;
//! use lookout::tracker::Tracker;
//!
//! # fn main() -> anyhow::Result<()> {
//! let ctx = LookoutContext::new()?;
//!
//! // Discover projects under the configured watch roots
//! let scanner = Scanner::from_config(&ctx.config);
//! let projects = scanner.scan();
//!
//! // Record a snapshot for each discovered project
//! let tracker = Tracker::new(ctx.ensure_data_dir()?, ctx.config.velocity.window_days);
//! for project in &projects {
//!     tracker.record(project)?;
//! }
//! # Ok(())
//! # }
//! ```

/// Command-line command implementations.
pub mod commands;

/// Configuration parsing and management.
pub mod config;

/// Git repository state extraction through the git porcelain layer.
pub mod git;

/// Scan locking to prevent concurrent scans against one data directory.
pub mod lock;

/// Project discovery: directory walking, classification, and statistics.
pub mod scanner;

/// Append-only project history and velocity derivation.
pub mod tracker;

/// Utility functions and helpers.
pub mod utils;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Current version of the lookout binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default data directory name within the home directory.
pub const DEFAULT_DATA_DIR: &str = ".lookout";

/// Default configuration file path relative to home directory.
pub const DEFAULT_CONFIG_PATH: &str = ".config/lookout/config.toml";

/// Directory name for per-project history logs within the data directory.
pub const HISTORY_DIR: &str = "history";

/// Central context for all lookout operations.
///
/// Holds the configuration file path and the loaded configuration. Commands
/// derive everything else (data directory, watch roots, scan policy) from
/// here.
#[derive(Debug, Clone)]
pub struct LookoutContext {
    /// Path to the configuration file.
    pub config_path: PathBuf,

    /// Loaded configuration settings.
    pub config: config::Config,
}

impl LookoutContext {
    /// Creates a new `LookoutContext` by loading the configuration from the
    /// default path (or `LOOKOUT_CONFIG_PATH` when set).
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined or if the
    /// configuration file cannot be read or created.
    pub fn new() -> Result<Self> {
        let config_path = if let Ok(path) = std::env::var("LOOKOUT_CONFIG_PATH") {
            PathBuf::from(path)
        } else {
            let home = dirs::home_dir().context("Could not find home directory")?;
            home.join(DEFAULT_CONFIG_PATH)
        };

        let config = config::Config::load(&config_path)?;

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Creates a new `LookoutContext` with an explicit config path for testing.
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be loaded or created.
    pub fn new_explicit(config_path: PathBuf) -> Result<Self> {
        let config = config::Config::load(&config_path)?;
        Ok(Self {
            config_path,
            config,
        })
    }

    /// Resolves the data directory, honoring the `LOOKOUT_DATA_DIR` override.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        if let Ok(path) = std::env::var("LOOKOUT_DATA_DIR") {
            PathBuf::from(path)
        } else {
            self.config.core.data_dir.clone()
        }
    }

    /// Ensures that the data directory and its subdirectories exist.
    ///
    /// # Errors
    /// Returns an error if the directories cannot be created, typically due
    /// to permission issues or invalid paths.
    pub fn ensure_data_dir(&self) -> Result<PathBuf> {
        let data_dir = self.data_dir();
        std::fs::create_dir_all(data_dir.join(HISTORY_DIR))
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
        Ok(data_dir)
    }
}
