//! Text field inside a modal

use super::Identifiable;
use crate::host::{ComponentLayout, TextStyle};
use crate::ident::CustomId;

/// A text field. Its `value` starts as the pre-filled text and is replaced
/// by what the user typed once the modal is submitted.
#[derive(Debug, Clone)]
pub struct TextInput {
    custom_id: Option<CustomId>,
    label: String,
    style: TextStyle,
    placeholder: Option<String>,
    min_length: Option<u16>,
    max_length: Option<u16>,
    required: bool,
    value: Option<String>,
}

impl Default for TextInput {
    fn default() -> Self {
        Self {
            custom_id: None,
            label: "Input".to_string(),
            style: TextStyle::Short,
            placeholder: None,
            min_length: None,
            max_length: None,
            required: true,
            value: None,
        }
    }
}

impl TextInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn set_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn set_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub fn set_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn set_min_length(mut self, min_length: u16) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn set_max_length(mut self, max_length: u16) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn set_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Text shown in the field when the modal opens
    pub fn set_pre_fill_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn set_custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(CustomId::raw(custom_id));
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub(crate) fn set_value(&mut self, value: String) {
        self.value = Some(value);
    }

    pub fn layout(&self) -> ComponentLayout {
        ComponentLayout::TextInput {
            custom_id: self
                .custom_id
                .as_ref()
                .map(|id| id.as_str().to_string())
                .unwrap_or_default(),
            label: self.label.clone(),
            style: self.style,
            placeholder: self.placeholder.clone(),
            min_length: self.min_length,
            max_length: self.max_length,
            required: self.required,
            value: self.value.clone(),
        }
    }
}

impl Identifiable for TextInput {
    fn custom_id(&self) -> Option<&CustomId> {
        self.custom_id.as_ref()
    }

    fn custom_id_slot(&mut self) -> &mut Option<CustomId> {
        &mut self.custom_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let input = TextInput::default();
        assert_eq!(input.label(), "Input");
        assert!(input.is_required());
        assert_eq!(input.value(), None);
    }

    #[test]
    fn test_pre_fill_shows_in_layout() {
        let input = TextInput::new("Name")
            .set_style(TextStyle::Paragraph)
            .set_max_length(200)
            .set_pre_fill_value("Anonymous");
        match input.layout() {
            ComponentLayout::TextInput {
                style,
                max_length,
                value,
                ..
            } => {
                assert_eq!(style, TextStyle::Paragraph);
                assert_eq!(max_length, Some(200));
                assert_eq!(value.as_deref(), Some("Anonymous"));
            }
            other => panic!("Expected text input layout, got {:?}", other),
        }
    }
}
