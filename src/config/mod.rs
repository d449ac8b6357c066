//! Configuration management.
//!
//! Configuration is stored as TOML under `~/.config/lookout/config.toml` and
//! created with defaults on first load. Scalar values can be read and written
//! through dotted keys (`scan.max_depth`, `velocity.window_days`, ...).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Top-level configuration document.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Core settings (data directory).
    #[serde(default)]
    pub core: CoreConfig,

    /// Project scanning policy (watch roots, excludes, depth).
    #[serde(default)]
    pub scan: ScanConfig,

    /// Velocity derivation settings.
    #[serde(default)]
    pub velocity: VelocityConfig,
}

/// Core settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Directory holding the per-project history logs.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// Scanning policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Watch roots under which projects are discovered.
    #[serde(default = "default_watch_paths")]
    pub watch_paths: Vec<PathBuf>,

    /// Substring patterns excluding directories and files from scanning.
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Maximum recursion depth (0 = classify immediate children only).
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Whether to recurse below the immediate children of each watch root.
    #[serde(default = "default_recursive")]
    pub recursive: bool,
}

/// Velocity derivation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelocityConfig {
    /// Trailing window, in days, over which velocity is derived.
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// Days of inactivity after which a project is flagged by the CLI.
    #[serde(default = "default_inactivity_threshold")]
    pub inactivity_threshold_days: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            watch_paths: default_watch_paths(),
            exclude_patterns: default_exclude_patterns(),
            max_depth: default_max_depth(),
            recursive: default_recursive(),
        }
    }
}

impl Default for VelocityConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            inactivity_threshold_days: default_inactivity_threshold(),
        }
    }
}

impl Config {
    /// Load configuration from a file, creating it with defaults if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Cannot create parent directories
    /// - Cannot read or parse the configuration file
    /// - Configuration file contains invalid TOML
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Save configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Cannot create parent directories
    /// - Cannot write to the file
    /// - TOML serialization fails
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(toml_str.as_bytes())?;
        Ok(())
    }

    /// Add a watch root if not already present. Returns `true` when added.
    pub fn add_watch_path(&mut self, path: PathBuf) -> bool {
        if self.scan.watch_paths.contains(&path) {
            return false;
        }
        self.scan.watch_paths.push(path);
        true
    }

    /// Remove a watch root. Returns `true` when a root was removed.
    pub fn remove_watch_path(&mut self, path: &Path) -> bool {
        let before = self.scan.watch_paths.len();
        self.scan.watch_paths.retain(|p| p != path);
        self.scan.watch_paths.len() != before
    }

    /// Get a configuration value by dotted key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();
        if parts.len() != 2 {
            return None;
        }

        match (parts[0], parts[1]) {
            ("core", "data_dir") => Some(self.core.data_dir.display().to_string()),
            ("scan", "max_depth") => Some(self.scan.max_depth.to_string()),
            ("scan", "recursive") => Some(self.scan.recursive.to_string()),
            ("velocity", "window_days") => Some(self.velocity.window_days.to_string()),
            ("velocity", "inactivity_threshold_days") => {
                Some(self.velocity.inactivity_threshold_days.to_string())
            }
            _ => None,
        }
    }

    /// Set a configuration value by dotted key.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The key format is invalid (must be section.key)
    /// - The key is unknown
    /// - The value is invalid for the key
    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();
        if parts.len() != 2 {
            return Err(anyhow::anyhow!("Invalid configuration key: {key}"));
        }

        match (parts[0], parts[1]) {
            ("core", "data_dir") => self.core.data_dir = PathBuf::from(value),
            ("scan", "max_depth") => {
                self.scan.max_depth = value
                    .parse()
                    .with_context(|| format!("Invalid number: {value}"))?;
            }
            ("scan", "recursive") => {
                self.scan.recursive = value
                    .parse()
                    .with_context(|| format!("Invalid boolean: {value}"))?;
            }
            ("velocity", "window_days") => {
                let days: u32 = value
                    .parse()
                    .with_context(|| format!("Invalid number: {value}"))?;
                if days == 0 {
                    return Err(anyhow::anyhow!("Velocity window must be at least 1 day"));
                }
                self.velocity.window_days = days;
            }
            ("velocity", "inactivity_threshold_days") => {
                self.velocity.inactivity_threshold_days = value
                    .parse()
                    .with_context(|| format!("Invalid number: {value}"))?;
            }
            _ => return Err(anyhow::anyhow!("Unknown configuration key: {key}")),
        }
        Ok(())
    }

    /// Reset a configuration value to its default by dotted key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key format is invalid or the key is unknown.
    pub fn unset(&mut self, key: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();
        if parts.len() != 2 {
            return Err(anyhow::anyhow!("Invalid configuration key: {key}"));
        }

        match (parts[0], parts[1]) {
            ("core", "data_dir") => self.core.data_dir = default_data_dir(),
            ("scan", "max_depth") => self.scan.max_depth = default_max_depth(),
            ("scan", "recursive") => self.scan.recursive = default_recursive(),
            ("velocity", "window_days") => self.velocity.window_days = default_window_days(),
            ("velocity", "inactivity_threshold_days") => {
                self.velocity.inactivity_threshold_days = default_inactivity_threshold();
            }
            _ => return Err(anyhow::anyhow!("Unknown configuration key: {key}")),
        }
        Ok(())
    }

    /// List all scalar configuration keys and their current values.
    #[must_use]
    pub fn list(&self) -> Vec<(&'static str, String)> {
        const KEYS: &[&str] = &[
            "core.data_dir",
            "scan.max_depth",
            "scan.recursive",
            "velocity.window_days",
            "velocity.inactivity_threshold_days",
        ];
        KEYS.iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }
}

/// Default data directory (`~/.lookout`).
fn default_data_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
    home.join(crate::DEFAULT_DATA_DIR)
}

/// Default watch roots (`~/coding`).
fn default_watch_paths() -> Vec<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
    vec![home.join("coding")]
}

/// Default exclude patterns for common build and dependency directories.
fn default_exclude_patterns() -> Vec<String> {
    [
        "node_modules",
        ".git",
        "__pycache__",
        "venv",
        ".env",
        "dist",
        "build",
        ".pytest_cache",
        ".tox",
        "target",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

/// Default maximum recursion depth.
const fn default_max_depth() -> usize {
    3
}

/// Default recursion policy.
const fn default_recursive() -> bool {
    true
}

/// Default velocity window in days.
const fn default_window_days() -> u32 {
    30
}

/// Default inactivity threshold in days.
const fn default_inactivity_threshold() -> u32 {
    7
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_creates_default_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let config = Config::load(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.scan.max_depth, 3);
        assert!(config.scan.recursive);
        assert_eq!(config.velocity.window_days, 30);
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let mut config = Config::default();
        config.scan.max_depth = 5;
        config.scan.recursive = false;
        config.scan.watch_paths = vec![PathBuf::from("/srv/projects")];
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.scan.max_depth, 5);
        assert!(!loaded.scan.recursive);
        assert_eq!(loaded.scan.watch_paths, vec![PathBuf::from("/srv/projects")]);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[scan]\nmax_depth = 1\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.scan.max_depth, 1);
        assert!(config.scan.recursive);
        assert!(!config.scan.exclude_patterns.is_empty());
    }

    #[test]
    fn test_get_and_set_keys() {
        let mut config = Config::default();

        config.set("scan.max_depth", "7".to_string()).unwrap();
        assert_eq!(config.get("scan.max_depth").as_deref(), Some("7"));

        config.set("scan.recursive", "false".to_string()).unwrap();
        assert_eq!(config.get("scan.recursive").as_deref(), Some("false"));

        config.unset("scan.max_depth").unwrap();
        assert_eq!(config.get("scan.max_depth").as_deref(), Some("3"));
        assert!(config.unset("scan.unknown").is_err());

        assert!(config.set("scan.max_depth", "abc".to_string()).is_err());
        assert!(config.set("velocity.window_days", "0".to_string()).is_err());
        assert!(config.set("nonsense", "1".to_string()).is_err());
        assert!(config.set("scan.unknown", "1".to_string()).is_err());
        assert!(config.get("scan.unknown").is_none());
    }

    #[test]
    fn test_watch_path_management() {
        let mut config = Config::default();
        let path = PathBuf::from("/srv/projects");

        assert!(config.add_watch_path(path.clone()));
        assert!(!config.add_watch_path(path.clone()));
        assert!(config.remove_watch_path(&path));
        assert!(!config.remove_watch_path(&path));
    }
}
