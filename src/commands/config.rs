//! Config command: read and write configuration values by dotted key.

use crate::LookoutContext;
use anyhow::Result;

/// Handles `lookout config [key] [value] [--list] [--unset]`.
///
/// With no key and `--list`, prints all scalar keys. With a key only, prints
/// that value. With a key and value, sets and saves. With a key and
/// `--unset`, resets the key to its default.
///
/// # Errors
/// Returns an error for unknown keys, invalid values, or when the
/// configuration cannot be saved.
pub fn execute(
    ctx: &mut LookoutContext,
    key: Option<&str>,
    value: Option<&str>,
    list: bool,
    unset: bool,
) -> Result<()> {
    if list {
        for (key, value) in ctx.config.list() {
            println!("{key} = {value}");
        }
        return Ok(());
    }

    let Some(key) = key else {
        anyhow::bail!("Specify a configuration key, or use --list");
    };

    if unset {
        ctx.config.unset(key)?;
        ctx.config.save(&ctx.config_path)?;
        super::print_success(&format!("Reset {key} to default"));
        return Ok(());
    }

    match value {
        Some(value) => {
            ctx.config.set(key, value.to_string())?;
            ctx.config.save(&ctx.config_path)?;
            super::print_success(&format!("Set {key} = {value}"));
        }
        None => match ctx.config.get(key) {
            Some(value) => println!("{value}"),
            None => anyhow::bail!("Unknown configuration key: {key}"),
        },
    }

    Ok(())
}
