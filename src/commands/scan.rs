//! Scan command: discover projects under the watch roots and record one
//! snapshot per project.

use crate::LookoutContext;
use crate::lock::ScanLock;
use crate::scanner::Scanner;
use crate::tracker::Tracker;
use crate::utils::format_size;
use anyhow::Result;
use colored::Colorize;

/// Runs a full scan and prints a per-project summary.
///
/// # Errors
/// Returns an error if the data directory is unusable, another scan holds
/// the lock, or a snapshot cannot be persisted. Per-directory traversal and
/// git failures never surface here; they only reduce what the scan finds.
pub fn execute(ctx: &LookoutContext) -> Result<()> {
    let data_dir = ctx.ensure_data_dir()?;
    let _lock = ScanLock::acquire(&data_dir)?;

    let scanner = Scanner::from_config(&ctx.config);
    let projects = scanner.scan();

    let tracker = Tracker::new(data_dir, ctx.config.velocity.window_days);
    for project in &projects {
        tracker.record(project)?;
    }

    for project in &projects {
        let velocity = tracker.velocity(&project.path)?;
        let inactivity = tracker.inactivity_days(&project.path)?;
        let dot = super::activity_dot(inactivity, ctx.config.velocity.inactivity_threshold_days);

        let branch = project
            .git
            .as_ref()
            .map_or_else(|| "-".to_string(), |git| git.branch.clone());

        println!(
            "{dot} {} [{}] {} on {}, {} active day(s), trend: {}",
            project.name.bold(),
            project.project_type,
            format_size(project.stats.total_size_bytes),
            branch,
            velocity.active_days,
            velocity.trend
        );
    }

    super::print_success(&format!("Scanned {} project(s)", projects.len()));
    Ok(())
}
