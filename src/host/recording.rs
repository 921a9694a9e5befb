//! In-memory host that records every call
//!
//! Stands in for a real platform client in the demo binary and in tests.
//! Each call is appended to a shared journal that can be inspected later.

use super::{Interaction, Message, Messenger, ModalLayout, ViewLayout};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// A host operation, as recorded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum HostCall {
    Send {
        message_id: u64,
        content: String,
        layout: Option<ViewLayout>,
    },
    Edit {
        message_id: u64,
        layout: Option<ViewLayout>,
    },
    Delete {
        message_id: u64,
    },
    RespondWithModal {
        interaction_id: u64,
        modal: ModalLayout,
    },
    EditOriginalResponse {
        interaction_id: u64,
        layout: Option<ViewLayout>,
    },
    DeleteResponse {
        interaction_id: u64,
    },
}

impl HostCall {
    /// Short name for log output
    pub fn name(&self) -> &'static str {
        match self {
            HostCall::Send { .. } => "send",
            HostCall::Edit { .. } => "edit",
            HostCall::Delete { .. } => "delete",
            HostCall::RespondWithModal { .. } => "respond_with_modal",
            HostCall::EditOriginalResponse { .. } => "edit_original_response",
            HostCall::DeleteResponse { .. } => "delete_response",
        }
    }
}

#[derive(Debug, Default)]
struct Journal {
    calls: Mutex<Vec<HostCall>>,
    next_id: AtomicU64,
    failing: AtomicBool,
}

impl Journal {
    fn record(&self, call: HostCall) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("host rejected {}", call.name());
        }
        tracing::debug!("host call: {:?}", call);
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        Ok(())
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Recording host; cheap to clone, all clones share one journal
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    journal: Arc<Journal>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh interaction handle backed by this host
    pub fn interaction(&self) -> Arc<RecordedInteraction> {
        Arc::new(RecordedInteraction {
            id: self.journal.next_id(),
            journal: self.journal.clone(),
        })
    }

    /// A message handle for a message that was sent elsewhere
    pub fn message(&self) -> Arc<RecordedMessage> {
        Arc::new(RecordedMessage {
            id: self.journal.next_id(),
            journal: self.journal.clone(),
        })
    }

    /// Make every following call fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.journal.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of all recorded calls, oldest first
    pub fn calls(&self) -> Vec<HostCall> {
        self.journal
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent recorded call
    pub fn last_call(&self) -> Option<HostCall> {
        self.journal
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn clear(&self) {
        self.journal
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[async_trait]
impl Messenger for RecordingHost {
    async fn send_message(
        &self,
        content: &str,
        layout: Option<&ViewLayout>,
    ) -> anyhow::Result<Arc<dyn Message>> {
        let message = RecordedMessage {
            id: self.journal.next_id(),
            journal: self.journal.clone(),
        };
        self.journal.record(HostCall::Send {
            message_id: message.id,
            content: content.to_string(),
            layout: layout.cloned(),
        })?;
        Ok(Arc::new(message))
    }
}

/// Message handle produced by [`RecordingHost`]
#[derive(Debug)]
pub struct RecordedMessage {
    pub id: u64,
    journal: Arc<Journal>,
}

#[async_trait]
impl Message for RecordedMessage {
    fn id(&self) -> Option<u64> {
        Some(self.id)
    }

    async fn edit(&self, layout: Option<&ViewLayout>) -> anyhow::Result<()> {
        self.journal.record(HostCall::Edit {
            message_id: self.id,
            layout: layout.cloned(),
        })
    }

    async fn delete(&self) -> anyhow::Result<()> {
        self.journal.record(HostCall::Delete {
            message_id: self.id,
        })
    }
}

/// Interaction handle produced by [`RecordingHost`]
#[derive(Debug)]
pub struct RecordedInteraction {
    pub id: u64,
    journal: Arc<Journal>,
}

#[async_trait]
impl Interaction for RecordedInteraction {
    async fn respond_with_modal(&self, modal: &ModalLayout) -> anyhow::Result<()> {
        self.journal.record(HostCall::RespondWithModal {
            interaction_id: self.id,
            modal: modal.clone(),
        })
    }

    async fn edit_original_response(&self, layout: Option<&ViewLayout>) -> anyhow::Result<()> {
        self.journal.record(HostCall::EditOriginalResponse {
            interaction_id: self.id,
            layout: layout.cloned(),
        })
    }

    async fn delete_response(&self) -> anyhow::Result<()> {
        self.journal.record(HostCall::DeleteResponse {
            interaction_id: self.id,
        })
    }
}
