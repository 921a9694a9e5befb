// Inbound interaction events delivered by the host platform
//
// The host's gateway decodes its wire format into an InteractionEvent and
// hands it to the Router. Using an enum for the payload keeps component
// clicks/selections and modal submissions type-safe.

use crate::host::Interaction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Platform user id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The user that triggered an interaction
///
/// Equality is by id only; display names change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

impl User {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: UserId(id),
            name: name.into(),
        }
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

/// One text field value from a submitted modal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedField {
    pub custom_id: String,
    pub value: String,
}

impl SubmittedField {
    pub fn new(custom_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            custom_id: custom_id.into(),
            value: value.into(),
        }
    }
}

/// What the user did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")] // {"type": "component", ...}
pub enum InteractionKind {
    /// Button click or select menu choice. `values` holds the selected option
    /// values in the order the platform reported them (empty for buttons).
    Component {
        custom_id: String,
        #[serde(default)]
        values: Vec<String>,
    },

    /// Modal form submitted
    ModalSubmit {
        custom_id: String,
        #[serde(default)]
        fields: Vec<SubmittedField>,
    },
}

/// An interaction delivered by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub timestamp: DateTime<Utc>,
    pub user: User,
    #[serde(flatten)]
    pub kind: InteractionKind,

    /// Message the component sits on, when the platform reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<u64>,

    /// Handle for responding to this interaction (open a modal, edit or
    /// delete the original response). Not part of the wire payload.
    #[serde(skip)]
    pub responder: Option<Arc<dyn Interaction>>,
}

impl InteractionEvent {
    pub fn new(user: User, kind: InteractionKind) -> Self {
        Self {
            timestamp: Utc::now(),
            user,
            kind,
            message_id: None,
            responder: None,
        }
    }

    /// Button click
    pub fn click(user: User, custom_id: impl Into<String>) -> Self {
        Self::new(
            user,
            InteractionKind::Component {
                custom_id: custom_id.into(),
                values: Vec::new(),
            },
        )
    }

    /// Select menu choice
    pub fn select<I, S>(user: User, custom_id: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            user,
            InteractionKind::Component {
                custom_id: custom_id.into(),
                values: values.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Modal submission
    pub fn submit(user: User, custom_id: impl Into<String>, fields: Vec<SubmittedField>) -> Self {
        Self::new(
            user,
            InteractionKind::ModalSubmit {
                custom_id: custom_id.into(),
                fields,
            },
        )
    }

    /// Record which message the interaction came from
    pub fn on_message(mut self, message_id: u64) -> Self {
        self.message_id = Some(message_id);
        self
    }

    /// Attach the host's response handle
    pub fn with_responder(mut self, responder: Arc<dyn Interaction>) -> Self {
        self.responder = Some(responder);
        self
    }

    pub fn custom_id(&self) -> &str {
        match &self.kind {
            InteractionKind::Component { custom_id, .. } => custom_id,
            InteractionKind::ModalSubmit { custom_id, .. } => custom_id,
        }
    }

    /// Selected values (empty for buttons and modal submissions)
    pub fn values(&self) -> &[String] {
        match &self.kind {
            InteractionKind::Component { values, .. } => values,
            InteractionKind::ModalSubmit { .. } => &[],
        }
    }

    /// Submitted fields (empty for component interactions)
    pub fn fields(&self) -> &[SubmittedField] {
        match &self.kind {
            InteractionKind::ModalSubmit { fields, .. } => fields,
            InteractionKind::Component { .. } => &[],
        }
    }

    pub fn is_modal_submit(&self) -> bool {
        matches!(self.kind, InteractionKind::ModalSubmit { .. })
    }
}
