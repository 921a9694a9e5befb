//! Select menu and its options
//!
//! A select carries two kinds of callbacks:
//! - a menu-level callback, gated by a [`SelectTrigger`]
//! - per-option callbacks, of which only the one for the *last* selected
//!   value runs
//!
//! Option values are unique within a menu; adding an option with a value that
//! already exists replaces the earlier option in place.

use super::{Component, Identifiable};
use crate::dispatch::{ComponentCallback, Invocation};
use crate::events::InteractionEvent;
use crate::host::{ComponentLayout, OptionLayout};
use crate::ident::CustomId;
use crate::view::ViewId;
use serde::{Deserialize, Serialize};

/// When the menu-level callback fires
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectTrigger {
    /// Every selection, whatever the count
    #[default]
    Always,
    /// Only when the count equals both `min_values` and `max_values`
    MinAndMax,
    /// Only when the count equals `max_values`
    OnlyMax,
}

impl SelectTrigger {
    pub fn is_met(self, count: usize, min_values: u8, max_values: u8) -> bool {
        match self {
            SelectTrigger::Always => true,
            SelectTrigger::MinAndMax => {
                count == usize::from(min_values) && count == usize::from(max_values)
            }
            SelectTrigger::OnlyMax => count == usize::from(max_values),
        }
    }
}

/// One entry of a select menu
#[derive(Debug, Clone)]
pub struct SelectOption {
    label: String,
    value: String,
    description: Option<String>,
    emoji: Option<String>,
    default: bool,
    callback: Option<ComponentCallback>,
}

impl SelectOption {
    /// Option whose value is its label
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            value: label.clone(),
            label,
            description: None,
            emoji: None,
            default: false,
            callback: None,
        }
    }

    pub fn set_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn set_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn set_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn set_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    /// Pre-select this option
    pub fn set_default(mut self, default: bool) -> Self {
        self.default = default;
        self
    }

    /// Callback run when this option is the last selected value
    pub fn on_select(mut self, callback: ComponentCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    fn layout(&self) -> OptionLayout {
        OptionLayout {
            label: self.label.clone(),
            value: self.value.clone(),
            description: self.description.clone(),
            emoji: self.emoji.clone(),
            default: self.default,
        }
    }
}

/// Drop-down select menu
#[derive(Debug, Clone)]
pub struct Select {
    custom_id: Option<CustomId>,
    placeholder: Option<String>,
    options: Vec<SelectOption>,
    disabled: bool,
    callback: Option<ComponentCallback>,
    trigger: SelectTrigger,
    min_values: u8,
    max_values: u8,
    /// Values from the most recent selection, in platform order
    values: Vec<String>,
    owner: Option<ViewId>,
}

impl Default for Select {
    fn default() -> Self {
        Self {
            custom_id: None,
            placeholder: None,
            options: Vec::new(),
            disabled: false,
            callback: None,
            trigger: SelectTrigger::Always,
            min_values: 1,
            max_values: 1,
            values: Vec::new(),
            owner: None,
        }
    }
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn add_option(mut self, option: SelectOption) -> Self {
        match self.options.iter_mut().find(|o| o.value == option.value) {
            Some(existing) => *existing = option,
            None => self.options.push(option),
        }
        self
    }

    pub fn add_options(self, options: impl IntoIterator<Item = SelectOption>) -> Self {
        options.into_iter().fold(self, Select::add_option)
    }

    pub fn set_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn set_custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(CustomId::raw(custom_id));
        self
    }

    pub fn set_min_values(mut self, min_values: u8) -> Self {
        self.min_values = min_values;
        self
    }

    pub fn set_max_values(mut self, max_values: u8) -> Self {
        self.max_values = max_values;
        self
    }

    pub fn set_trigger(mut self, trigger: SelectTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Menu-level callback, gated by the trigger
    pub fn on_select(mut self, callback: ComponentCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn option(&self, value: &str) -> Option<&SelectOption> {
        self.options.iter().find(|o| o.value == value)
    }

    pub fn trigger(&self) -> SelectTrigger {
        self.trigger
    }

    pub fn min_values(&self) -> u8 {
        self.min_values
    }

    pub fn max_values(&self) -> u8 {
        self.max_values
    }

    fn id_for_logs(&self) -> &str {
        self.custom_id.as_ref().map(CustomId::as_str).unwrap_or("")
    }
}

impl Identifiable for Select {
    fn custom_id(&self) -> Option<&CustomId> {
        self.custom_id.as_ref()
    }

    fn custom_id_slot(&mut self) -> &mut Option<CustomId> {
        &mut self.custom_id
    }
}

impl Component for Select {
    fn kind(&self) -> &'static str {
        "select"
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    fn owner(&self) -> Option<ViewId> {
        self.owner
    }

    fn set_owner(&mut self, owner: ViewId) {
        self.owner = Some(owner);
    }

    fn values(&self) -> Vec<String> {
        self.values.clone()
    }

    fn layout(&self) -> ComponentLayout {
        ComponentLayout::Select {
            custom_id: self.id_for_logs().to_string(),
            placeholder: self.placeholder.clone(),
            options: self.options.iter().map(SelectOption::layout).collect(),
            min_values: self.min_values,
            max_values: self.max_values,
            disabled: self.disabled,
        }
    }

    fn resolve(&mut self, event: &InteractionEvent) -> Vec<Invocation> {
        self.values = event.values().to_vec();
        let id = self.id_for_logs().to_string();
        let mut invocations = Vec::new();

        if let Some(callback) = &self.callback {
            if self
                .trigger
                .is_met(self.values.len(), self.min_values, self.max_values)
            {
                invocations.push(Invocation::new(id.clone(), callback.clone()));
            } else {
                tracing::trace!(
                    "Select '{}' trigger {:?} not met by {} value(s)",
                    id,
                    self.trigger,
                    self.values.len()
                );
            }
        }

        let Some(last) = self.values.last() else {
            tracing::warn!("Select '{}' received an empty selection", id);
            return invocations;
        };

        match self.option(last) {
            Some(option) => {
                if let Some(callback) = &option.callback {
                    invocations.push(Invocation::new(
                        format!("{}[{}]", id, option.value),
                        callback.clone(),
                    ));
                }
            }
            None => {
                tracing::warn!("Select '{}' has no option with value {:?}", id, last);
            }
        }

        invocations
    }
}

impl From<Select> for Box<dyn Component> {
    fn from(select: Select) -> Self {
        Box::new(select)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Callback;
    use crate::events::User;

    fn noop() -> ComponentCallback {
        Callback::sync(|_| Ok(()))
    }

    fn choose(select: &mut Select, values: &[&str]) -> Vec<String> {
        let event = InteractionEvent::select(User::new(1, "a"), "menu", values.iter().copied());
        select
            .resolve(&event)
            .iter()
            .map(|i| i.source().to_string())
            .collect()
    }

    #[test]
    fn test_trigger_rules() {
        assert!(SelectTrigger::Always.is_met(0, 1, 1));
        assert!(SelectTrigger::Always.is_met(3, 1, 1));
        assert!(SelectTrigger::MinAndMax.is_met(2, 2, 2));
        assert!(!SelectTrigger::MinAndMax.is_met(2, 1, 2));
        assert!(!SelectTrigger::MinAndMax.is_met(1, 2, 2));
        assert!(SelectTrigger::OnlyMax.is_met(3, 1, 3));
        assert!(!SelectTrigger::OnlyMax.is_met(2, 1, 3));
    }

    #[test]
    fn test_option_value_defaults_to_label() {
        let option = SelectOption::new("Red");
        assert_eq!(option.value(), "Red");
        let option = SelectOption::new("Red").set_value("r");
        assert_eq!(option.value(), "r");
        assert_eq!(option.label(), "Red");
    }

    #[test]
    fn test_duplicate_option_value_replaces() {
        let select = Select::new()
            .add_option(SelectOption::new("A"))
            .add_option(SelectOption::new("B"))
            .add_option(SelectOption::new("A again").set_value("A").on_select(noop()));
        assert_eq!(select.options().len(), 2);
        assert_eq!(select.options()[0].label(), "A again");
        assert!(select.option("A").unwrap().has_callback());
    }

    #[test]
    fn test_min_and_max_trigger() {
        let mut select = Select::new()
            .set_custom_id("menu")
            .set_min_values(2)
            .set_max_values(2)
            .set_trigger(SelectTrigger::MinAndMax)
            .add_options([SelectOption::new("a"), SelectOption::new("b")])
            .on_select(noop());

        assert_eq!(choose(&mut select, &["a", "b"]), ["menu"]);
        assert!(choose(&mut select, &["a"]).is_empty());
    }

    #[test]
    fn test_last_selected_option_callback() {
        let mut select = Select::new()
            .set_custom_id("menu")
            .set_max_values(2)
            .add_option(SelectOption::new("a"))
            .add_option(SelectOption::new("b").on_select(noop()));

        assert_eq!(choose(&mut select, &["a", "b"]), ["menu[b]"]);
        assert!(
            choose(&mut select, &["b", "a"]).is_empty(),
            "Only the last selected value is resolved"
        );
    }

    #[test]
    fn test_empty_selection_skips_option_callbacks() {
        let mut select = Select::new()
            .set_custom_id("menu")
            .add_option(SelectOption::new("a").on_select(noop()))
            .on_select(noop());

        // Always trigger still fires, nothing indexes out of range
        assert_eq!(choose(&mut select, &[]), ["menu"]);
    }

    #[test]
    fn test_unknown_value_is_ignored() {
        let mut select = Select::new()
            .set_custom_id("menu")
            .add_option(SelectOption::new("a").on_select(noop()));
        assert!(choose(&mut select, &["zzz"]).is_empty());
    }

    #[test]
    fn test_selection_is_recorded() {
        let mut select = Select::new().set_custom_id("menu").set_max_values(3);
        choose(&mut select, &["x", "y"]);
        assert_eq!(select.values(), ["x", "y"]);
    }
}
