//! Errors raised to application code

use thiserror::Error;

/// Misuse of a view or modal by application code
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    /// No component at the requested position
    #[error("no component at index {index} (collection has {len})")]
    ComponentNotFound { index: usize, len: usize },

    /// Two components would end up with the same custom id
    #[error("custom id {0:?} is already used in this collection")]
    DuplicateCustomId(String),

    /// The operation needs an interaction to respond to
    #[error("no interaction to respond to")]
    NoInteraction,
}

pub type Result<T> = std::result::Result<T, ViewError>;
