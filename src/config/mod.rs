//! Configuration for viewgen
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/viewgen/config.toml)
//! 3. Built-in defaults (lowest priority)

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod demo;
mod observability;
mod serialization;
mod views;


pub use demo::{DemoConfig, FileDemo};
pub use observability::{FileLogFile, FileLogging, LogFile, LogRotation, LoggingConfig};
pub use views::{FileViews, ViewsConfig};

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Defaults for newly built views
    pub views: ViewsConfig,

    /// Scripted demo session settings
    pub demo: DemoConfig,
}

/// Config file structure; every field is optional
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    /// Optional [logging] section
    pub logging: Option<FileLogging>,

    /// Optional [views] section
    pub views: Option<FileViews>,

    /// Optional [demo] section
    pub demo: Option<FileDemo>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/viewgen/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("viewgen").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        // Don't overwrite existing config
        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        // Config::default().to_toml() is the single source of truth
        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Read and parse a config file. A missing file yields defaults; a file
    /// that exists but cannot be read or parsed is an error, so a broken
    /// config never silently falls back to defaults.
    pub(crate) fn read_file_config(path: &Path) -> anyhow::Result<FileConfig> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("failed to parse {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => {
                Err(e).with_context(|| format!("failed to read {}", path.display()))
            }
        }
    }

    /// Load configuration: file -> env vars -> defaults
    pub fn load() -> anyhow::Result<Self> {
        let file = match Self::config_path() {
            Some(path) => Self::read_file_config(&path)?,
            None => FileConfig::default(),
        };
        Ok(Self::resolve(file, |key| std::env::var(key).ok()))
    }

    /// Merge a parsed file with environment overrides looked up by `env`
    pub(crate) fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let mut logging = LoggingConfig::from_file(file.logging);
        let mut views = ViewsConfig::from_file(file.views);
        let mut demo = DemoConfig::from_file(file.demo);

        // Log levels: env > file > default (RUST_LOG is applied later, by the filter)
        logging.apply_env(&env);

        // Custom id prefix: env > file > default
        if let Some(prefix) = env("VIEWGEN_PREFIX") {
            views.prefix = prefix;
        }

        // Demo pacing: env > file > default; unparsable values are ignored
        if let Some(delay) = env("VIEWGEN_DEMO_DELAY_MS").and_then(|v| v.parse().ok()) {
            demo.step_delay_ms = delay;
        }

        Self {
            logging,
            views,
            demo,
        }
    }
}
