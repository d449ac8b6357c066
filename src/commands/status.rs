//! Status command: summary of every tracked project, most recent first.

use crate::LookoutContext;
use crate::tracker::Tracker;
use crate::utils::format_size;
use anyhow::Result;
use colored::Colorize;

/// Prints the all-projects summary.
///
/// # Errors
/// Returns an error if the history store cannot be read.
pub fn execute(ctx: &LookoutContext) -> Result<()> {
    let tracker = Tracker::new(ctx.data_dir(), ctx.config.velocity.window_days);
    let summaries = tracker.summary()?;

    if summaries.is_empty() {
        super::print_info("No tracked projects yet. Run 'lookout scan' first.");
        return Ok(());
    }

    let threshold = ctx.config.velocity.inactivity_threshold_days;
    let active = summaries
        .iter()
        .filter(|s| s.inactivity_days < i64::from(threshold))
        .count();

    println!(
        "{} tracked project(s), {} active\n",
        summaries.len(),
        active
    );

    for summary in &summaries {
        let dot = super::activity_dot(summary.inactivity_days, threshold);
        println!(
            "{dot} {} ({} file(s), {})",
            summary.name.bold(),
            summary.stats.file_count,
            format_size(summary.stats.total_size_bytes),
        );
        println!(
            "    last activity {} ({} day(s) ago), {} active day(s), trend: {}",
            summary.last_activity.format("%Y-%m-%d"),
            summary.inactivity_days,
            summary.velocity.active_days,
            summary.velocity.trend
        );
        println!("    {}", summary.path.display().to_string().dimmed());
    }

    Ok(())
}
