//! viewgen - interactive message components for chat bots
//!
//! Application code declares buttons, selects and modals with callbacks
//! attached. viewgen gives every component a stable custom id, routes
//! incoming interactions back to the right callback, and enforces per-view
//! policies on who may respond and what happens once a view has been used.
//!
//! ```text
//! InteractionEvent → Router → View gate (author check, one-shot action)
//!                           → Component::resolve → callbacks
//! ```
//!
//! Talking to the platform (sending, editing and deleting messages) goes
//! through the traits in [`host`].

pub mod components;
pub mod config;
pub mod demo;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod host;
pub mod ident;
pub mod logging;
pub mod view;

pub use components::{Button, Component, Select, SelectOption, SelectTrigger, TextInput};
pub use dispatch::{
    Callback, ComponentCallback, ComponentContext, ModalCallback, ModalContext, Outcome, Router,
};
pub use error::ViewError;
pub use events::{InteractionEvent, SubmittedField, User, UserId};
pub use view::{Modal, RespondTarget, UsedBehavior, View, ViewHandle, ViewId};
