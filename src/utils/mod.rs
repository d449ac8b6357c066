//! Utility functions and helpers.
//!
//! This module provides a collection of utility functions used throughout lookout:
//!
//! - Path manipulation (tilde expansion)
//! - Exclude pattern matching
//! - File size formatting
//!
//! # Examples
//!
//! ```
//! use lookout::utils::{expand_tilde, format_size};
//!
//! # fn main() -> anyhow::Result<()> {
//! // Expand tilde in paths
//! let path = expand_tilde("~/coding")?;
//!
//! // Format file sizes
//! let size_str = format_size(1024 * 1024); // "1.00 MB"
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use std::path::PathBuf;

/// Expands a path starting with `~` to the user's home directory.
///
/// # Errors
///
/// Returns an error if the path is empty.
pub fn expand_tilde(path: &str) -> Result<PathBuf> {
    if path.is_empty() {
        anyhow::bail!("Path cannot be empty");
    }
    if let Some(home) = dirs::home_dir() {
        if path == "~" {
            return Ok(home);
        }
        if let Some(rest) = path.strip_prefix("~/") {
            return Ok(home.join(rest));
        }
    }
    Ok(PathBuf::from(path))
}

/// Checks whether `candidate` contains any of `patterns` as a substring.
///
/// This is the exclude semantics used by both the project walker (matched
/// against directory names) and the statistics collector (matched against
/// full file paths). An empty pattern list excludes nothing.
#[must_use]
pub fn matches_any(candidate: &str, patterns: &[String]) -> bool {
    patterns
        .iter()
        .any(|pattern| !pattern.is_empty() && candidate.contains(pattern.as_str()))
}

/// Formats a byte size as a human-readable string.
#[must_use]
pub fn format_size(size: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = size as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", size.round() as u64, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}
