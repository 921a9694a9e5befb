//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::{Config, LogFile};

impl Config {
    /// Render the config as a commented TOML file
    pub fn to_toml(&self) -> String {
        let log_file = self.logging.file.clone().unwrap_or_default();
        format!(
            r#"# viewgen configuration

# Logging configuration (RUST_LOG env var overrides the level)
[logging]
level = "{log_level}"
# Least severe level listed in the demo's problem summary
capture = "{log_capture}"

# JSON file logging (in addition to stderr)
[logging.file]
enabled = {log_file_enabled}
dir = "{log_file_dir}"
prefix = "{log_file_prefix}"
rotation = "{log_file_rotation}"  # hourly, daily, never

# Defaults for new views
[views]
# Accept only the first authorized interaction
only_one_response = {only_one_response}
# After the first interaction: nothing, disable_items, view_close, message_delete
used_behavior = "{used_behavior}"
# Who may interact when a view has an author: only_author, all_users
respond_target = "{respond_target}"
# Inactivity timeout in seconds (0 = never expire)
timeout_secs = {timeout_secs}
# Custom id prefix, composed as "<prefix>-<id>" (empty = none)
prefix = "{prefix}"

# Scripted session for `viewgen demo`
[demo]
user_id = {demo_user_id}
user_name = "{demo_user_name}"
step_delay_ms = {demo_step_delay_ms}
"#,
            log_level = escape(&self.logging.level),
            log_capture = self.logging.capture.as_str().to_ascii_lowercase(),
            log_file_enabled = self.logging.file.is_some(),
            log_file_dir = escape(&log_file.dir.display().to_string()),
            log_file_prefix = escape(&log_file.prefix),
            log_file_rotation = log_file.rotation.as_str(),
            only_one_response = self.views.only_one_response,
            used_behavior = self.views.used_behavior.as_str(),
            respond_target = self.views.respond_target.as_str(),
            timeout_secs = self.views.timeout_secs,
            prefix = escape(&self.views.prefix),
            demo_user_id = self.demo.user_id,
            demo_user_name = escape(&self.demo.user_name),
            demo_step_delay_ms = self.demo.step_delay_ms,
        )
    }
}

/// Escape a value for a basic TOML string
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
