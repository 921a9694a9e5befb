//! Component value objects
//!
//! Components are plain builders: display attributes plus an optional
//! callback. They become live once a [`View`](crate::view::View) adopts them,
//! which assigns the custom id and the owner reference.
//!
//! # Capabilities
//!
//! - [`Identifiable`] - has a custom id slot, may be link-style (no id)
//! - [`Component`] - can be shown in a view and turns an interaction into
//!   the callbacks that should run
//!
//! Views only ever go through these traits, so prefixing and routing never
//! branch on the concrete component type.

use crate::dispatch::Invocation;
use crate::error::{Result, ViewError};
use crate::events::InteractionEvent;
use crate::host::ComponentLayout;
use crate::ident::{CustomId, IdAllocator};
use crate::view::ViewId;
use std::fmt;

mod button;
mod select;
mod text_input;

pub use button::Button;
pub use select::{Select, SelectOption, SelectTrigger};
pub use text_input::TextInput;

/// Anything that carries a custom id
pub trait Identifiable {
    fn custom_id(&self) -> Option<&CustomId>;

    /// Mutable access to the id slot, used when a collection adopts the
    /// component
    fn custom_id_slot(&mut self) -> &mut Option<CustomId>;

    /// Link-style components open a URL and never produce interactions, so
    /// they never get a custom id
    fn is_link(&self) -> bool {
        false
    }
}

/// A component that can live in a view
pub trait Component: Identifiable + fmt::Debug + Send + Sync {
    /// Short type name for logs ("button", "select")
    fn kind(&self) -> &'static str;

    fn is_disabled(&self) -> bool;

    fn set_disabled(&mut self, disabled: bool);

    /// The view this component was added to
    fn owner(&self) -> Option<ViewId>;

    fn set_owner(&mut self, owner: ViewId);

    /// Current value(s): the last selection for a select, empty for a button
    fn values(&self) -> Vec<String>;

    /// Snapshot for the host
    fn layout(&self) -> ComponentLayout;

    /// Record an interaction aimed at this component and return the
    /// callbacks to run, in order
    fn resolve(&mut self, event: &InteractionEvent) -> Vec<Invocation>;
}

/// Give `item` its final custom id within a collection.
///
/// Link-style items lose any id. Items without an id get the next id from
/// `ids` (skipping values that are already `taken`). The prefix, if any, is
/// composed once. Fails if the resulting id is already in use.
pub(crate) fn assign_custom_id<T, F>(
    item: &mut T,
    ids: &mut IdAllocator,
    prefix: Option<&str>,
    taken: F,
) -> Result<Option<String>>
where
    T: Identifiable + ?Sized,
    F: Fn(&str) -> bool,
{
    if item.is_link() {
        *item.custom_id_slot() = None;
        return Ok(None);
    }

    let slot = item.custom_id_slot();
    if slot.as_ref().is_some_and(|id| id.as_str().is_empty()) {
        *slot = None;
    }

    let id = match slot.take() {
        Some(mut id) => {
            if let Some(prefix) = prefix {
                id.apply_prefix(prefix);
            }
            if taken(id.as_str()) {
                let value = id.as_str().to_string();
                *slot = Some(id);
                return Err(ViewError::DuplicateCustomId(value));
            }
            id
        }
        None => loop {
            let mut id = CustomId::generated(ids.next());
            if let Some(prefix) = prefix {
                id.apply_prefix(prefix);
            }
            if !taken(id.as_str()) {
                break id;
            }
        },
    };

    let value = id.as_str().to_string();
    *slot = Some(id);
    Ok(Some(value))
}
