//! Clickable button

use super::{Component, Identifiable};
use crate::dispatch::{ComponentCallback, Invocation};
use crate::events::InteractionEvent;
use crate::host::{ButtonStyle, ComponentLayout};
use crate::ident::CustomId;
use crate::view::ViewId;

/// A button. Link-style buttons (with a URL) open the URL client-side and
/// never reach the router.
#[derive(Debug, Clone, Default)]
pub struct Button {
    custom_id: Option<CustomId>,
    label: Option<String>,
    style: ButtonStyle,
    url: Option<String>,
    emoji: Option<String>,
    disabled: bool,
    callback: Option<ComponentCallback>,
    owner: Option<ViewId>,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    /// Link button pointing at `url`
    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(label).set_url(url)
    }

    pub fn set_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Turn this into a link button; drops any custom id
    pub fn set_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self.style = ButtonStyle::Link;
        self.custom_id = None;
        self
    }

    pub fn set_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    pub fn set_style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }

    pub fn set_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn set_custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(CustomId::raw(custom_id));
        self
    }

    /// Callback run when the button is clicked
    pub fn on_click(mut self, callback: ComponentCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn style(&self) -> ButtonStyle {
        self.style
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl Identifiable for Button {
    fn custom_id(&self) -> Option<&CustomId> {
        self.custom_id.as_ref()
    }

    fn custom_id_slot(&mut self) -> &mut Option<CustomId> {
        &mut self.custom_id
    }

    fn is_link(&self) -> bool {
        self.url.is_some() || self.style == ButtonStyle::Link
    }
}

impl Component for Button {
    fn kind(&self) -> &'static str {
        "button"
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
        Vec::new()
    }

    fn layout(&self) -> ComponentLayout {
        ComponentLayout::Button {
            custom_id: self.custom_id.as_ref().map(|id| id.as_str().to_string()),
            label: self.label.clone(),
            style: self.style,
            url: self.url.clone(),
            emoji: self.emoji.clone(),
            disabled: self.disabled,
        }
    }

    fn resolve(&mut self, _event: &InteractionEvent) -> Vec<Invocation> {
        let Some(callback) = &self.callback else {
            return Vec::new();
        };
        let source = self
            .custom_id
            .as_ref()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default();
        vec![Invocation::new(source, callback.clone())]
    }
}

impl From<Button> for Box<dyn Component> {
    fn from(button: Button) -> Self {
        Box::new(button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Callback;
    use crate::events::User;

    #[test]
    fn test_defaults() {
        let button = Button::new("Confirm");
        assert_eq!(button.label(), Some("Confirm"));
        assert_eq!(button.style(), ButtonStyle::Primary);
        assert!(!button.is_disabled());
        assert!(!button.is_link());
    }

    #[test]
    fn test_set_url_switches_to_link_style() {
        let button = Button::new("Docs")
            .set_custom_id("docs")
            .set_url("https://example.com");
        assert!(button.is_link());
        assert_eq!(button.style(), ButtonStyle::Link);
        assert!(button.custom_id().is_none());
    }

    #[test]
    fn test_link_style_without_url_is_link() {
        let button = Button::new("Odd").set_style(ButtonStyle::Link);
        assert!(button.is_link());
    }

    #[test]
    fn test_resolve_without_callback_is_empty() {
        let mut button = Button::new("Nothing");
        let event = InteractionEvent::click(User::new(1, "a"), "0");
        assert!(button.resolve(&event).is_empty());
    }

    #[test]
    fn test_resolve_returns_click_callback() {
        let mut button = Button::new("Go")
            .set_custom_id("go")
            .on_click(Callback::sync(|_| Ok(())));
        let event = InteractionEvent::click(User::new(1, "a"), "go");
        let invocations = button.resolve(&event);
        assert_eq!(invocations.len(), 1);
        assert_eq!(invocations[0].source(), "go");
    }

    #[test]
    fn test_layout_reflects_state() {
        let mut button = Button::new("Go").set_emoji("✅").set_custom_id("go");
        button.set_owner(ViewId::next());
        Component::set_disabled(&mut button, true);
        match button.layout() {
            ComponentLayout::Button {
                custom_id,
                disabled,
                emoji,
                ..
            } => {
                assert_eq!(custom_id.as_deref(), Some("go"));
                assert!(disabled);
                assert_eq!(emoji.as_deref(), Some("✅"));
            }
            other => panic!("Expected button layout, got {:?}", other),
        }
    }
}
