//! [demo] section: the scripted session run by `viewgen demo`

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    /// Id of the user who "owns" the demo views
    pub user_id: u64,
    /// Display name of that user
    pub user_name: String,
    /// Pause between scripted interactions
    pub step_delay_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            user_id: 1001,
            user_name: "demo-user".to_string(),
            step_delay_ms: 250,
        }
    }
}

/// [demo] settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileDemo {
    pub user_id: Option<u64>,
    pub user_name: Option<String>,
    pub step_delay_ms: Option<u64>,
}

impl DemoConfig {
    pub fn from_file(file: Option<FileDemo>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            user_id: file.user_id.unwrap_or(defaults.user_id),
            user_name: file.user_name.unwrap_or(defaults.user_name),
            step_delay_ms: file.step_delay_ms.unwrap_or(defaults.step_delay_ms),
        }
    }
}
