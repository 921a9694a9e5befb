//! Modal forms
//!
//! A modal is a collection of text inputs shown in response to an
//! interaction. It is opened through [`Router::open_modal`] (usually via
//! [`ComponentContext::open_modal`]) and routed exactly once: the router
//! drops it as soon as it has been submitted.
//!
//! [`Router::open_modal`]: crate::dispatch::Router::open_modal
//! [`ComponentContext::open_modal`]: crate::dispatch::ComponentContext::open_modal

use super::ViewHandle;
use crate::components::{assign_custom_id, Identifiable, TextInput};
use crate::dispatch::ModalCallback;
use crate::error::{Result, ViewError};
use crate::events::{InteractionEvent, User};
use crate::host::{Message, ModalLayout};
use crate::ident::IdAllocator;
use std::sync::Arc;

/// Custom id used when none is set
pub const DEFAULT_MODAL_ID: &str = "modal";

#[derive(Debug, Clone)]
pub struct Modal {
    custom_id: String,
    title: String,
    inputs: Vec<TextInput>,
    ids: IdAllocator,
    author: Option<User>,
    message: Option<Arc<dyn Message>>,
    parent_view: Option<ViewHandle>,
    used: bool,
    callback: Option<ModalCallback>,
}

impl Modal {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            custom_id: DEFAULT_MODAL_ID.to_string(),
            title: title.into(),
            inputs: Vec::new(),
            ids: IdAllocator::new(),
            author: None,
            message: None,
            parent_view: None,
            used: false,
            callback: None,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self
    }

    /// An empty id falls back to [`DEFAULT_MODAL_ID`]
    pub fn set_custom_id(&mut self, custom_id: impl Into<String>) -> &mut Self {
        let custom_id = custom_id.into();
        self.custom_id = if custom_id.is_empty() {
            DEFAULT_MODAL_ID.to_string()
        } else {
            custom_id
        };
        self
    }

    /// Only this user may submit the modal
    pub fn set_author(&mut self, author: User) -> &mut Self {
        self.author = Some(author);
        self
    }

    /// The message the modal was opened from
    pub fn set_message(&mut self, message: Arc<dyn Message>) -> &mut Self {
        self.message = Some(message);
        self
    }

    /// The view the modal was opened from; handed to the submit callback
    pub fn set_parent_view(&mut self, view: ViewHandle) -> &mut Self {
        self.parent_view = Some(view);
        self
    }

    pub fn on_submit(&mut self, callback: ModalCallback) -> &mut Self {
        self.callback = Some(callback);
        self
    }

    /// Append a text input, giving it an id if it has none
    pub fn add_input(&mut self, mut input: TextInput) -> Result<&mut Self> {
        let inputs = &self.inputs;
        let id = assign_custom_id(&mut input, &mut self.ids, None, |id| {
            inputs
                .iter()
                .any(|i| i.custom_id().is_some_and(|c| c.as_str() == id))
        })?;
        tracing::debug!(
            "Modal '{}' added input {}",
            self.custom_id,
            id.unwrap_or_default()
        );
        self.inputs.push(input);
        Ok(self)
    }

    pub fn add_inputs(&mut self, inputs: impl IntoIterator<Item = TextInput>) -> Result<&mut Self> {
        for input in inputs {
            self.add_input(input)?;
        }
        Ok(self)
    }

    pub fn custom_id(&self) -> &str {
        &self.custom_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> Option<&User> {
        self.author.as_ref()
    }

    pub fn message(&self) -> Option<&Arc<dyn Message>> {
        self.message.as_ref()
    }

    pub fn parent_view(&self) -> Option<&ViewHandle> {
        self.parent_view.as_ref()
    }

    pub fn callback(&self) -> Option<&ModalCallback> {
        self.callback.as_ref()
    }

    /// Set once the modal has been submitted
    pub fn is_used(&self) -> bool {
        self.used
    }

    pub fn inputs(&self) -> &[TextInput] {
        &self.inputs
    }

    /// Value of the input at `index`: the submitted text after submission,
    /// the pre-filled text before
    pub fn value_at(&self, index: usize) -> Result<Option<&str>> {
        self.inputs
            .get(index)
            .map(TextInput::value)
            .ok_or(ViewError::ComponentNotFound {
                index,
                len: self.inputs.len(),
            })
    }

    /// True when the modal has no author or `user` is the author
    pub fn check_author(&self, user: &User) -> bool {
        self.author.as_ref().map_or(true, |author| author == user)
    }

    pub fn layout(&self) -> ModalLayout {
        ModalLayout {
            custom_id: self.custom_id.clone(),
            title: self.title.clone(),
            components: self.inputs.iter().map(TextInput::layout).collect(),
        }
    }

    /// Write submitted field values into the matching inputs and mark the
    /// modal used
    pub(crate) fn apply_submission(&mut self, event: &InteractionEvent) {
        for field in event.fields() {
            let input = self
                .inputs
                .iter_mut()
                .find(|i| i.custom_id().is_some_and(|c| c.as_str() == field.custom_id));
            match input {
                Some(input) => input.set_value(field.value.clone()),
                None => tracing::debug!(
                    "Modal '{}' got a value for unknown input '{}'",
                    self.custom_id,
                    field.custom_id
                ),
            }
        }
        self.used = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SubmittedField;

    fn form() -> Modal {
        let mut modal = Modal::new("Profile");
        modal
            .add_inputs([
                TextInput::new("Name").set_pre_fill_value("anon"),
                TextInput::new("Bio").set_custom_id("bio"),
            ])
            .unwrap();
        modal
    }

    #[test]
    fn test_defaults() {
        let modal = Modal::new("Form");
        assert_eq!(modal.custom_id(), DEFAULT_MODAL_ID);
        assert_eq!(modal.title(), "Form");
        assert!(!modal.is_used());
        assert!(modal.inputs().is_empty());
    }

    #[test]
    fn test_inputs_get_ids() {
        let modal = form();
        let layout = modal.layout();
        let ids: Vec<_> = layout
            .components
            .iter()
            .filter_map(|c| c.custom_id())
            .collect();
        assert_eq!(ids, ["0", "bio"]);
    }

    #[test]
    fn test_duplicate_input_id_rejected() {
        let mut modal = form();
        let err = modal
            .add_input(TextInput::new("Other").set_custom_id("bio"))
            .unwrap_err();
        assert_eq!(err, ViewError::DuplicateCustomId("bio".to_string()));
        assert_eq!(modal.inputs().len(), 2);
    }

    #[test]
    fn test_submission_fills_values() {
        let mut modal = form();
        assert_eq!(modal.value_at(0).unwrap(), Some("anon"));
        assert_eq!(modal.value_at(1).unwrap(), None);

        let event = InteractionEvent::submit(
            User::new(1, "a"),
            "modal",
            vec![
                SubmittedField::new("0", "Ada"),
                SubmittedField::new("bio", "Mathematician"),
                SubmittedField::new("ghost", "ignored"),
            ],
        );
        modal.apply_submission(&event);

        assert!(modal.is_used());
        assert_eq!(modal.value_at(0).unwrap(), Some("Ada"));
        assert_eq!(modal.value_at(1).unwrap(), Some("Mathematician"));
    }

    #[test]
    fn test_value_at_out_of_range() {
        let modal = form();
        assert_eq!(
            modal.value_at(5).unwrap_err(),
            ViewError::ComponentNotFound { index: 5, len: 2 }
        );
    }

    #[test]
    fn test_check_author() {
        let mut modal = Modal::new("Form");
        assert!(modal.check_author(&User::new(9, "anyone")));
        modal.set_author(User::new(1, "alice"));
        assert!(modal.check_author(&User::new(1, "renamed")));
        assert!(!modal.check_author(&User::new(2, "bob")));
    }

    #[test]
    fn test_empty_custom_id_falls_back() {
        let mut modal = Modal::new("Form");
        modal.set_custom_id("");
        assert_eq!(modal.custom_id(), DEFAULT_MODAL_ID);
    }
}
