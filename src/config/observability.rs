//! [logging] section
//!
//! Three sinks are configured here: the stderr console (filtered by `level`
//! or RUST_LOG), the in-memory capture that feeds the demo's problem summary,
//! and an optional rolling JSON file under `[logging.file]`.

use crate::logging::LogLevel;
use serde::Deserialize;
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

const DEFAULT_LEVEL: &str = "info";

/// How often the JSON log file rolls over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl LogRotation {
    /// Unknown values fall back to daily
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" => Self::Hourly,
            "never" => Self::Never,
            _ => Self::Daily,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }

    fn rotation(self) -> Rotation {
        match self {
            Self::Hourly => Rotation::HOURLY,
            Self::Daily => Rotation::DAILY,
            Self::Never => Rotation::NEVER,
        }
    }
}

/// Rolling JSON log files, e.g. `./logs/viewgen.2024-01-15`
#[derive(Debug, Clone, PartialEq)]
pub struct LogFile {
    pub dir: PathBuf,
    pub prefix: String,
    pub rotation: LogRotation,
}

impl Default for LogFile {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./logs"),
            prefix: "viewgen".to_string(),
            rotation: LogRotation::Daily,
        }
    }
}

impl LogFile {
    /// Create the log directory and open the appender
    pub fn appender(&self) -> std::io::Result<RollingFileAppender> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(RollingFileAppender::new(
            self.rotation.rotation(),
            &self.dir,
            &self.prefix,
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Console level for viewgen's own targets
    pub level: String,
    /// Least severe level kept in memory for the end-of-run problem summary
    pub capture: LogLevel,
    /// JSON file output; `None` logs to stderr only
    pub file: Option<LogFile>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            capture: LogLevel::Warn,
            file: None,
        }
    }
}

/// `[logging]` as written in the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub capture: Option<String>,
    pub file: Option<FileLogFile>,
}

/// `[logging.file]` as written in the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogFile {
    pub enabled: Option<bool>,
    pub dir: Option<String>,
    pub prefix: Option<String>,
    pub rotation: Option<String>,
}

impl LoggingConfig {
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        let log_file = file.file.and_then(|section| {
            if !section.enabled.unwrap_or(false) {
                return None;
            }
            let base = LogFile::default();
            Some(LogFile {
                dir: section.dir.map(PathBuf::from).unwrap_or(base.dir),
                prefix: section.prefix.unwrap_or(base.prefix),
                rotation: section
                    .rotation
                    .map(|s| LogRotation::from_str(&s))
                    .unwrap_or(base.rotation),
            })
        });

        Self {
            level: file.level.unwrap_or(defaults.level),
            capture: file
                .capture
                .as_deref()
                .and_then(LogLevel::parse)
                .unwrap_or(defaults.capture),
            file: log_file,
        }
    }

    /// VIEWGEN_LOG_LEVEL replaces the console level; VIEWGEN_LOG_CAPTURE the
    /// capture level when it names a real level
    pub fn apply_env(&mut self, env: &impl Fn(&str) -> Option<String>) {
        if let Some(level) = env("VIEWGEN_LOG_LEVEL") {
            self.level = level;
        }
        if let Some(capture) = env("VIEWGEN_LOG_CAPTURE").as_deref().and_then(LogLevel::parse) {
            self.capture = capture;
        }
    }

    /// Filter directive for the console and file layers. A non-empty
    /// RUST_LOG wins over the configured level.
    pub fn filter_directive(&self, rust_log: Option<String>) -> String {
        match rust_log.filter(|v| !v.trim().is_empty()) {
            Some(directive) => directive,
            None => format!("viewgen={}", self.level),
        }
    }

    /// Directive used when the configured one does not parse
    pub fn fallback_directive() -> String {
        format!("viewgen={}", DEFAULT_LEVEL)
    }
}
