//! View policies: the one-shot behavior and who may respond

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What a single-response view does after its first authorized interaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsedBehavior {
    /// Mark the view used, change nothing on screen
    #[default]
    Nothing,
    /// Disable every component and sync the message
    DisableItems,
    /// Strip all components from the message, keep its content
    ViewClose,
    /// Delete the message (or the interaction response)
    MessageDelete,
}

impl UsedBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsedBehavior::Nothing => "nothing",
            UsedBehavior::DisableItems => "disable_items",
            UsedBehavior::ViewClose => "view_close",
            UsedBehavior::MessageDelete => "message_delete",
        }
    }

    /// Parse from config string; unknown values fall back to `Nothing`
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().replace('-', "_").as_str() {
            "disable_items" | "disable" => UsedBehavior::DisableItems,
            "view_close" | "close" => UsedBehavior::ViewClose,
            "message_delete" | "delete" => UsedBehavior::MessageDelete,
            _ => UsedBehavior::Nothing,
        }
    }
}

/// Who may interact with a view that has an author
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RespondTarget {
    #[default]
    OnlyAuthor,
    /// Anyone; the author is kept for bookkeeping only
    AllUsers,
}

impl RespondTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            RespondTarget::OnlyAuthor => "only_author",
            RespondTarget::AllUsers => "all_users",
        }
    }

    /// Parse from config string; unknown values fall back to `OnlyAuthor`
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().replace('-', "_").as_str() {
            "all_users" | "all" | "everyone" => RespondTarget::AllUsers,
            _ => RespondTarget::OnlyAuthor,
        }
    }
}

/// Settings a new view starts from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewDefaults {
    pub only_one_response: bool,
    pub used_behavior: UsedBehavior,
    pub respond_target: RespondTarget,
    pub timeout: Option<Duration>,
    /// Empty or missing means no prefix
    pub prefix: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_used_behavior_round_trips_through_strings() {
        for behavior in [
            UsedBehavior::Nothing,
            UsedBehavior::DisableItems,
            UsedBehavior::ViewClose,
            UsedBehavior::MessageDelete,
        ] {
            assert_eq!(UsedBehavior::from_str(behavior.as_str()), behavior);
        }
        assert_eq!(UsedBehavior::from_str("Disable-Items"), UsedBehavior::DisableItems);
        assert_eq!(UsedBehavior::from_str("garbage"), UsedBehavior::Nothing);
    }

    #[test]
    fn test_respond_target_parsing() {
        assert_eq!(RespondTarget::from_str("all_users"), RespondTarget::AllUsers);
        assert_eq!(RespondTarget::from_str("ALL"), RespondTarget::AllUsers);
        assert_eq!(RespondTarget::from_str("only_author"), RespondTarget::OnlyAuthor);
        assert_eq!(RespondTarget::from_str("?"), RespondTarget::OnlyAuthor);
    }
}
