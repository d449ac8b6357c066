//! Show command: detail view for one tracked project.

use crate::LookoutContext;
use crate::tracker::Tracker;
use crate::utils::{expand_tilde, format_size};
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

/// Prints velocity, inactivity, and the latest snapshot for one project.
///
/// The path is matched by identity, so it is canonicalized the same way the
/// scanner canonicalizes discovered projects.
///
/// # Errors
/// Returns an error if the path has no tracked history or the history store
/// cannot be read.
pub fn execute(ctx: &LookoutContext, path: &str) -> Result<()> {
    let expanded = expand_tilde(path)?;
    let canonical: PathBuf = expanded.canonicalize().unwrap_or(expanded);

    let tracker = Tracker::new(ctx.data_dir(), ctx.config.velocity.window_days);
    let history = tracker.history(&canonical)?;

    let Some(last) = history.last() else {
        anyhow::bail!(
            "No history for {}. Run 'lookout scan' first.",
            canonical.display()
        );
    };

    let velocity = tracker.velocity(&canonical)?;
    let inactivity = tracker.inactivity_days(&canonical)?;
    let dot = super::activity_dot(inactivity, ctx.config.velocity.inactivity_threshold_days);

    println!("{dot} {}", canonical.display().to_string().bold());
    println!("  snapshots:     {}", history.len());
    println!(
        "  last activity: {} ({} day(s) ago)",
        last.timestamp.format("%Y-%m-%d %H:%M"),
        inactivity
    );
    println!(
        "  velocity:      {} active day(s), {:.2}/day, trend: {}",
        velocity.active_days, velocity.commits_per_day, velocity.trend
    );
    println!(
        "  files:         {} ({})",
        last.stats.file_count,
        format_size(last.stats.total_size_bytes)
    );

    if let Some(git) = &last.git {
        println!("  branch:        {}{}", git.branch, dirty_marker(git.is_dirty));
        if let Some(commit) = &git.last_commit {
            println!(
                "  last commit:   {} {} ({})",
                commit.sha_prefix.yellow(),
                commit.message,
                commit.author
            );
        } else {
            println!("  last commit:   none (unborn branch)");
        }
        if let Some(remote) = &git.remote_url {
            println!("  remote:        {remote}");
        }
    } else {
        println!("  git:           not a repository");
    }

    Ok(())
}

/// Suffix marking a dirty working tree.
fn dirty_marker(is_dirty: bool) -> &'static str {
    if is_dirty { " (dirty)" } else { "" }
}
