//! Host platform interface
//!
//! The dispatch layer never talks to the network itself. Sending, editing and
//! deleting messages and answering interactions go through these traits,
//! which the embedding bot implements on top of its platform client.
//!
//! What gets pushed to the host is a layout snapshot: a serializable
//! description of the components as they currently stand. Rendering it into
//! native widgets is the host's job.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub mod recording;

// ─────────────────────────────────────────────────────────────────────────────
// Layout snapshots
// ─────────────────────────────────────────────────────────────────────────────

/// Visual style of a button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    #[default]
    Primary,
    Secondary,
    Success,
    Danger,
    /// Opens a URL instead of sending an interaction
    Link,
}

/// Single-line or multi-line text input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    #[default]
    Short,
    Paragraph,
}

/// One selectable entry of a select menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionLayout {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    pub default: bool,
}

/// One component as the host should render it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentLayout {
    Button {
        #[serde(skip_serializing_if = "Option::is_none")]
        custom_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        style: ButtonStyle,
        #[serde(skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        emoji: Option<String>,
        disabled: bool,
    },
    Select {
        custom_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        options: Vec<OptionLayout>,
        min_values: u8,
        max_values: u8,
        disabled: bool,
    },
    TextInput {
        custom_id: String,
        label: String,
        style: TextStyle,
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        min_length: Option<u16>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_length: Option<u16>,
        required: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
}

impl ComponentLayout {
    pub fn is_disabled(&self) -> bool {
        match self {
            ComponentLayout::Button { disabled, .. } => *disabled,
            ComponentLayout::Select { disabled, .. } => *disabled,
            ComponentLayout::TextInput { .. } => false,
        }
    }

    pub fn custom_id(&self) -> Option<&str> {
        match self {
            ComponentLayout::Button { custom_id, .. } => custom_id.as_deref(),
            ComponentLayout::Select { custom_id, .. } => Some(custom_id),
            ComponentLayout::TextInput { custom_id, .. } => Some(custom_id),
        }
    }
}

/// Components of a view, in display order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewLayout {
    pub components: Vec<ComponentLayout>,
}

impl ViewLayout {
    pub fn all_disabled(&self) -> bool {
        self.components.iter().all(ComponentLayout::is_disabled)
    }
}

/// A modal form as the host should render it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalLayout {
    pub custom_id: String,
    pub title: String,
    pub components: Vec<ComponentLayout>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Host traits
// ─────────────────────────────────────────────────────────────────────────────

/// A message the bot has sent
///
/// `edit(None)` removes every component from the message but keeps its
/// content.
#[async_trait]
pub trait Message: fmt::Debug + Send + Sync {
    /// Platform id of the message, if the host knows it. Interactions on
    /// the message carry the same id, which lets the router tell apart
    /// views that reuse custom ids.
    fn id(&self) -> Option<u64> {
        None
    }

    async fn edit(&self, layout: Option<&ViewLayout>) -> anyhow::Result<()>;
    async fn delete(&self) -> anyhow::Result<()>;
}

/// An interaction that can still be answered
#[async_trait]
pub trait Interaction: fmt::Debug + Send + Sync {
    async fn respond_with_modal(&self, modal: &ModalLayout) -> anyhow::Result<()>;
    async fn edit_original_response(&self, layout: Option<&ViewLayout>) -> anyhow::Result<()>;
    async fn delete_response(&self) -> anyhow::Result<()>;
}

/// Sends new messages (a channel, a DM, a webhook...)
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(
        &self,
        content: &str,
        layout: Option<&ViewLayout>,
    ) -> anyhow::Result<Arc<dyn Message>>;
}
