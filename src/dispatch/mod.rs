//! Interaction routing
//!
//! ```text
//! InteractionEvent → Router → View (authorization gate, one-shot policy)
//!                                → Component::resolve → [Invocation, ...]
//!                  → callbacks run with the view unlocked
//! ```
//!
//! The view lock is held only for the gate and for resolving the component.
//! Callbacks run after it is released and receive the [`ViewHandle`] so they
//! can lock the view themselves.
//!
//! [`ViewHandle`]: crate::view::ViewHandle

mod callback;
mod router;

pub use callback::{
    Callback, CallbackFuture, ComponentCallback, ComponentContext, ModalCallback, ModalContext,
};
pub(crate) use callback::run_isolated;
pub use router::Router;

/// A callback selected for one interaction, tagged with where it came from
#[derive(Debug, Clone)]
pub struct Invocation {
    source: String,
    callback: ComponentCallback,
}

impl Invocation {
    pub fn new(source: impl Into<String>, callback: ComponentCallback) -> Self {
        Self {
            source: source.into(),
            callback,
        }
    }

    /// Custom id (plus option value for per-option callbacks), for logs
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn callback(&self) -> &ComponentCallback {
        &self.callback
    }
}

/// Result of routing one interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No live view or open modal owns the custom id
    Unrouted,
    /// The view's authorization gate turned the user away; nothing ran
    Rejected,
    /// The interaction reached its component
    Handled {
        /// Callbacks that were run
        invoked: usize,
        /// How many of those failed (logged and suppressed)
        failed: usize,
    },
}

impl Outcome {
    pub fn was_handled(self) -> bool {
        matches!(self, Outcome::Handled { .. })
    }

    /// Callbacks that ran, zero unless handled
    pub fn invoked(self) -> usize {
        match self {
            Outcome::Handled { invoked, .. } => invoked,
            _ => 0,
        }
    }
}
