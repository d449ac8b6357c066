//! CLI command implementations.

/// `config` command: get, set, unset, and list configuration values.
pub mod config;

/// `scan` command: discover projects and record snapshots.
pub mod scan;

/// `show` command: detail view for one project.
pub mod show;

/// `status` command: all-projects summary.
pub mod status;

/// `watch` command: manage watch roots.
pub mod watch;

use colored::Colorize;

/// Prints a success message with a green check mark.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message with a red cross.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints an informational message.
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Activity indicator dot colored by days of inactivity relative to the
/// configured threshold.
#[must_use]
pub fn activity_dot(inactivity_days: i64, threshold_days: u32) -> colored::ColoredString {
    let threshold = i64::from(threshold_days);
    if inactivity_days < threshold {
        "●".green()
    } else if inactivity_days < threshold * 4 {
        "●".yellow()
    } else {
        "●".red()
    }
}
