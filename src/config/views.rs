//! [views] section: defaults applied to every view built through the config

use crate::view::{RespondTarget, UsedBehavior, ViewDefaults};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewsConfig {
    /// Accept only the first authorized interaction
    pub only_one_response: bool,
    /// What a single-response view does once consumed
    pub used_behavior: UsedBehavior,
    /// Who may interact with a view that has an author
    pub respond_target: RespondTarget,
    /// Inactivity timeout in seconds (0 = never expire)
    pub timeout_secs: u64,
    /// Custom id prefix (empty = none)
    pub prefix: String,
}

/// [views] settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileViews {
    pub only_one_response: Option<bool>,
    pub used_behavior: Option<String>,
    pub respond_target: Option<String>,
    pub timeout_secs: Option<u64>,
    pub prefix: Option<String>,
}

impl ViewsConfig {
    pub fn from_file(file: Option<FileViews>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            only_one_response: file.only_one_response.unwrap_or(defaults.only_one_response),
            used_behavior: file
                .used_behavior
                .map(|s| UsedBehavior::from_str(&s))
                .unwrap_or(defaults.used_behavior),
            respond_target: file
                .respond_target
                .map(|s| RespondTarget::from_str(&s))
                .unwrap_or(defaults.respond_target),
            timeout_secs: file.timeout_secs.unwrap_or(defaults.timeout_secs),
            prefix: file.prefix.unwrap_or(defaults.prefix),
        }
    }

    /// Seed for [`View::with_defaults`](crate::view::View::with_defaults)
    pub fn to_defaults(&self) -> ViewDefaults {
        ViewDefaults {
            only_one_response: self.only_one_response,
            used_behavior: self.used_behavior,
            respond_target: self.respond_target,
            timeout: (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
            prefix: (!self.prefix.is_empty()).then(|| self.prefix.clone()),
        }
    }
}
