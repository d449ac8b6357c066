//! Watch command: manage the configured watch roots.

use crate::LookoutContext;
use crate::utils::expand_tilde;
use anyhow::Result;
use std::path::PathBuf;

/// Adds a watch root and saves the configuration.
///
/// # Errors
/// Returns an error if the path is empty or the configuration cannot be
/// saved.
pub fn add(ctx: &mut LookoutContext, path: &str) -> Result<()> {
    let expanded = expand_tilde(path)?;
    if !expanded.is_dir() {
        super::print_warning(&format!(
            "{} does not exist yet; it will be skipped until it does",
            expanded.display()
        ));
    }

    if ctx.config.add_watch_path(expanded.clone()) {
        ctx.config.save(&ctx.config_path)?;
        super::print_success(&format!("Watching {}", expanded.display()));
    } else {
        super::print_info(&format!("Already watching {}", expanded.display()));
    }
    Ok(())
}

/// Removes a watch root and saves the configuration.
///
/// # Errors
/// Returns an error if the path is empty or the configuration cannot be
/// saved.
pub fn remove(ctx: &mut LookoutContext, path: &str) -> Result<()> {
    let expanded = expand_tilde(path)?;

    if ctx.config.remove_watch_path(&expanded) {
        ctx.config.save(&ctx.config_path)?;
        super::print_success(&format!("Stopped watching {}", expanded.display()));
    } else {
        anyhow::bail!("Not watching {}", expanded.display());
    }
    Ok(())
}

/// Lists the configured watch roots.
pub fn list(ctx: &LookoutContext) {
    if ctx.config.scan.watch_paths.is_empty() {
        super::print_info("No watch paths configured");
        return;
    }

    for path in &ctx.config.scan.watch_paths {
        let marker = if watch_root_exists(path) { " " } else { "!" };
        println!("{marker} {}", path.display());
    }
}

/// Whether a configured root currently resolves to a directory.
fn watch_root_exists(path: &PathBuf) -> bool {
    expand_tilde(&path.to_string_lossy()).is_ok_and(|p| p.is_dir())
}
