//! Custom identifiers for interactive components
//!
//! Every non-link component needs a custom id so the platform can route an
//! interaction back to it. Ids are either supplied by the caller (raw) or
//! handed out by the owning view's [`IdAllocator`] (generated). A view may
//! namespace its ids with a prefix, composed as `{prefix}-{id}`.

use std::fmt;

/// Separator between a view prefix and the component id
pub const PREFIX_SEPARATOR: char = '-';

/// Per-view sequence of generated ids: "0", "1", "2", ...
///
/// Owned by the view itself, so two views never share a counter and a value
/// is never handed out twice by the same allocator.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the next id and advance the counter
    pub fn next(&mut self) -> String {
        let id = self.next;
        self.next += 1;
        id.to_string()
    }

    /// How many ids have been handed out so far
    pub fn issued(&self) -> u64 {
        self.next
    }
}

/// Where an id came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdOrigin {
    /// Supplied by application code
    Raw,
    /// Produced by an [`IdAllocator`]; `prefixed` records whether a view
    /// prefix has already been composed onto it
    Generated { prefixed: bool },
}

/// A component's custom id together with its origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomId {
    value: String,
    origin: IdOrigin,
}

impl CustomId {
    /// Caller-supplied id
    pub fn raw(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            origin: IdOrigin::Raw,
        }
    }

    /// Allocator-produced id, not yet prefixed
    pub fn generated(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            origin: IdOrigin::Generated { prefixed: false },
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn origin(&self) -> IdOrigin {
        self.origin
    }

    pub fn is_generated(&self) -> bool {
        matches!(self.origin, IdOrigin::Generated { .. })
    }

    /// Whether the id already carries `prefix` (as `{prefix}-...`)
    pub fn has_prefix(&self, prefix: &str) -> bool {
        match self.origin {
            IdOrigin::Generated { prefixed } => prefixed && self.starts_with_prefix(prefix),
            IdOrigin::Raw => self.starts_with_prefix(prefix),
        }
    }

    fn starts_with_prefix(&self, prefix: &str) -> bool {
        self.value
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(PREFIX_SEPARATOR))
    }

    /// Compose `prefix` onto the id unless it is already there.
    ///
    /// Generated ids are prefixed at most once. Raw ids are prefixed unless
    /// they already start with `{prefix}-`. Returns true if the id changed.
    pub fn apply_prefix(&mut self, prefix: &str) -> bool {
        let needs_prefix = match self.origin {
            IdOrigin::Generated { prefixed } => !prefixed,
            IdOrigin::Raw => !self.starts_with_prefix(prefix),
        };
        needs_prefix && self.compose_prefix(prefix)
    }

    /// Compose `prefix` onto the id unless it already starts with `{prefix}-`.
    ///
    /// Used when a view's prefix changes after components were added: an id
    /// carrying an older prefix gets the new one in front of it.
    pub fn reapply_prefix(&mut self, prefix: &str) -> bool {
        !self.starts_with_prefix(prefix) && self.compose_prefix(prefix)
    }

    fn compose_prefix(&mut self, prefix: &str) -> bool {
        if prefix.is_empty() {
            return false;
        }
        self.value = compose(prefix, &self.value);
        if let IdOrigin::Generated { prefixed } = &mut self.origin {
            *prefixed = true;
        }
        true
    }
}

impl fmt::Display for CustomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// `{prefix}-{id}`
pub fn compose(prefix: &str, id: &str) -> String {
    format!("{}{}{}", prefix, PREFIX_SEPARATOR, id)
}
