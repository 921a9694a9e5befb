//! Views: ordered collections of components attached to a message
//!
//! A view is built by application code, published with [`View::send`] or
//! [`View::respond`], and from then on lives behind a [`ViewHandle`] that
//! the [`Router`](crate::dispatch::Router) locks while it runs the
//! authorization gate.
//!
//! # One-shot views
//!
//! With `only_one_response` set, the first authorized interaction marks the
//! view used and applies its [`UsedBehavior`]. The flag never resets; later
//! interactions pass the gate without repeating the action.

use crate::components::{assign_custom_id, Component};
use crate::dispatch::Invocation;
use crate::error::{Result, ViewError};
use crate::events::{InteractionEvent, User};
use crate::host::{Interaction, Message, Messenger, ViewLayout};
use crate::ident::{CustomId, IdAllocator};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

mod modal;
mod policy;

pub use modal::{Modal, DEFAULT_MODAL_ID};
pub use policy::{RespondTarget, UsedBehavior, ViewDefaults};

/// A published view, shared between the router and callbacks
pub type ViewHandle = Arc<tokio::sync::Mutex<View>>;

/// Process-unique view identity
///
/// Only names the view in logs and component ownership; custom ids come from
/// each view's own [`IdAllocator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

impl ViewId {
    pub fn next() -> Self {
        ViewId(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// What the router needs to pick a view without locking it. Every change to
/// these fields is mirrored here under the view's own lock.
#[derive(Debug, Clone, Default)]
pub(crate) struct RouteKeys {
    pub(crate) custom_ids: Vec<String>,
    pub(crate) message_id: Option<u64>,
    pub(crate) closed: bool,
    pub(crate) deadline: Option<Instant>,
}

impl RouteKeys {
    pub(crate) fn is_live(&self, now: Instant) -> bool {
        !self.closed && self.deadline.map_or(true, |deadline| now < deadline)
    }

    pub(crate) fn owns(&self, custom_id: &str) -> bool {
        self.custom_ids.iter().any(|id| id == custom_id)
    }
}

/// Route keys shared between a view and the router
#[derive(Debug, Clone, Default)]
pub(crate) struct SharedRouteKeys(Arc<Mutex<RouteKeys>>);

impl SharedRouteKeys {
    pub(crate) fn lock(&self) -> MutexGuard<'_, RouteKeys> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug)]
pub struct View {
    id: ViewId,
    components: Vec<Box<dyn Component>>,
    ids: IdAllocator,
    prefix: Option<String>,
    author: Option<User>,
    message: Option<Arc<dyn Message>>,
    interaction: Option<Arc<dyn Interaction>>,
    only_one_response: bool,
    used_behavior: UsedBehavior,
    respond_target: RespondTarget,
    used: bool,
    timeout: Option<Duration>,
    last_activity: Instant,
    closed: bool,
    route: SharedRouteKeys,
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl View {
    pub fn new() -> Self {
        Self::with_defaults(&ViewDefaults::default())
    }

    pub fn with_defaults(defaults: &ViewDefaults) -> Self {
        let view = Self {
            id: ViewId::next(),
            components: Vec::new(),
            ids: IdAllocator::new(),
            prefix: defaults.prefix.clone().filter(|p| !p.is_empty()),
            author: None,
            message: None,
            interaction: None,
            only_one_response: defaults.only_one_response,
            used_behavior: defaults.used_behavior,
            respond_target: defaults.respond_target,
            used: false,
            timeout: defaults.timeout,
            last_activity: Instant::now(),
            closed: false,
            route: SharedRouteKeys::default(),
        };
        view.sync_route();
        view
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    // ─────────────────────────────────────────────────────────────────────
    // Building
    // ─────────────────────────────────────────────────────────────────────

    /// Append a component, assigning its final custom id.
    ///
    /// Fails without adding anything if a caller-supplied id collides with
    /// one already in the view.
    pub fn add_component(&mut self, component: impl Into<Box<dyn Component>>) -> Result<&mut Self> {
        let mut component = component.into();
        let components = &self.components;
        let id = assign_custom_id(
            &mut *component,
            &mut self.ids,
            self.prefix.as_deref(),
            |id| components.iter().any(|c| has_custom_id(c.custom_id(), id)),
        )?;
        component.set_owner(self.id);
        tracing::debug!(
            "{} added {} {}",
            self.id,
            component.kind(),
            id.as_deref().unwrap_or("(link)")
        );
        self.components.push(component);
        self.sync_route();
        Ok(self)
    }

    /// Append several components; stops at the first failure
    pub fn add_components<I, C>(&mut self, components: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Box<dyn Component>>,
    {
        for component in components {
            self.add_component(component)?;
        }
        Ok(self)
    }

    /// Set the author; `exclusive` also restricts the view to the author
    pub fn set_author(&mut self, author: User, exclusive: bool) -> &mut Self {
        self.author = Some(author);
        if exclusive {
            self.respond_target = RespondTarget::OnlyAuthor;
        }
        self
    }

    pub fn set_only_one_response(&mut self, only_one_response: bool) -> &mut Self {
        self.only_one_response = only_one_response;
        self
    }

    pub fn set_used_behavior(&mut self, behavior: UsedBehavior) -> &mut Self {
        self.used_behavior = behavior;
        self
    }

    pub fn set_respond_target(&mut self, target: RespondTarget) -> &mut Self {
        self.respond_target = target;
        self
    }

    /// Inactivity timeout; the router drops the view once it has elapsed
    pub fn set_timeout(&mut self, timeout: Option<Duration>) -> &mut Self {
        self.timeout = timeout;
        self.sync_route();
        self
    }

    pub fn set_message(&mut self, message: Arc<dyn Message>) -> &mut Self {
        self.message = Some(message);
        self.sync_route();
        self
    }

    pub fn set_interaction(&mut self, interaction: Arc<dyn Interaction>) -> &mut Self {
        self.interaction = Some(interaction);
        self
    }

    /// Set the custom id prefix for components added from now on.
    ///
    /// With `sync`, ids already in the view get the prefix too, unless they
    /// already start with `{prefix}-`. Calling this twice with the same
    /// prefix changes nothing the second time.
    pub fn set_prefix(&mut self, prefix: impl Into<String>, sync: bool) -> &mut Self {
        let prefix = prefix.into();
        if prefix.is_empty() {
            self.prefix = None;
            return self;
        }

        if sync {
            for index in 0..self.components.len() {
                let Some(mut id) = self.components[index].custom_id().cloned() else {
                    continue;
                };
                if !id.reapply_prefix(&prefix) {
                    continue;
                }
                let clash = self
                    .components
                    .iter()
                    .enumerate()
                    .any(|(i, c)| i != index && has_custom_id(c.custom_id(), id.as_str()));
                if clash {
                    tracing::warn!(
                        "{} kept custom id {:?}: prefixed form {:?} is taken",
                        self.id,
                        self.components[index].custom_id().map(|c| c.as_str()),
                        id.as_str()
                    );
                    continue;
                }
                *self.components[index].custom_id_slot() = Some(id);
            }
            self.sync_route();
        }

        tracing::debug!("{} prefix set to '{}'", self.id, prefix);
        self.prefix = Some(prefix);
        self
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn components(&self) -> &[Box<dyn Component>] {
        &self.components
    }

    pub fn component(&self, index: usize) -> Result<&dyn Component> {
        self.components
            .get(index)
            .map(|c| &**c)
            .ok_or(ViewError::ComponentNotFound {
                index,
                len: self.components.len(),
            })
    }

    /// Current values of the component at `index` (a select's last
    /// selection; empty for buttons)
    pub fn values_at(&self, index: usize) -> Result<Vec<String>> {
        self.component(index).map(|c| c.values())
    }

    /// Final custom ids in display order; link buttons are skipped
    pub fn custom_ids(&self) -> Vec<&str> {
        self.components
            .iter()
            .filter_map(|c| c.custom_id().map(|id| id.as_str()))
            .collect()
    }

    pub fn contains_custom_id(&self, custom_id: &str) -> bool {
        self.components
            .iter()
            .any(|c| has_custom_id(c.custom_id(), custom_id))
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn author(&self) -> Option<&User> {
        self.author.as_ref()
    }

    pub fn message(&self) -> Option<&Arc<dyn Message>> {
        self.message.as_ref()
    }

    /// Host id of the bound message, if any
    pub fn message_id(&self) -> Option<u64> {
        self.message.as_ref().and_then(|m| m.id())
    }

    pub fn interaction(&self) -> Option<&Arc<dyn Interaction>> {
        self.interaction.as_ref()
    }

    pub fn only_one_response(&self) -> bool {
        self.only_one_response
    }

    pub fn used_behavior(&self) -> UsedBehavior {
        self.used_behavior
    }

    pub fn respond_target(&self) -> RespondTarget {
        self.respond_target
    }

    /// Whether the one-shot gate has been consumed
    pub fn is_used(&self) -> bool {
        self.used
    }

    /// Closed views are no longer routed to
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.timeout
            .is_some_and(|timeout| now.saturating_duration_since(self.last_activity) >= timeout)
    }

    /// Restart the inactivity timeout
    pub fn touch(&mut self, now: Instant) {
        self.last_activity = now;
        self.sync_route();
    }

    pub fn layout(&self) -> ViewLayout {
        ViewLayout {
            components: self.components.iter().map(|c| c.layout()).collect(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────

    /// True when there is no author, the view accepts all users, or `user`
    /// is the author
    pub fn check_author(&self, user: &User) -> bool {
        match (&self.author, self.respond_target) {
            (None, _) => true,
            (Some(_), RespondTarget::AllUsers) => true,
            (Some(author), RespondTarget::OnlyAuthor) => author == user,
        }
    }

    /// The gate every interaction passes before any callback runs.
    ///
    /// Runs the one-shot action on the first authorized interaction of a
    /// single-response view. Host failures during that action are logged;
    /// the interaction is still authorized.
    pub async fn interaction_authorized(&mut self, event: &InteractionEvent) -> bool {
        if !self.check_author(&event.user) {
            return false;
        }
        if self.only_one_response && !self.used {
            self.used = true;
            tracing::info!(
                "{} consumed by user {}, applying {}",
                self.id,
                event.user.id,
                self.used_behavior.as_str()
            );
            if let Err(e) = self.apply_used_behavior().await {
                tracing::warn!("{} one-shot action failed: {:#}", self.id, e);
            }
        }
        true
    }

    async fn apply_used_behavior(&mut self) -> anyhow::Result<()> {
        match self.used_behavior {
            UsedBehavior::Nothing => Ok(()),
            UsedBehavior::DisableItems => self.disable_all(true).await,
            UsedBehavior::ViewClose => self.close_view(true).await,
            UsedBehavior::MessageDelete => self.close_and_delete(true).await,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Disable every component; with `sync`, push the new layout
    pub async fn disable_all(&mut self, sync: bool) -> anyhow::Result<()> {
        self.set_all_disabled(true, sync).await
    }

    /// Enable every component; with `sync`, push the new layout
    pub async fn enable_all(&mut self, sync: bool) -> anyhow::Result<()> {
        self.set_all_disabled(false, sync).await
    }

    async fn set_all_disabled(&mut self, disabled: bool, sync: bool) -> anyhow::Result<()> {
        for component in &mut self.components {
            component.set_disabled(disabled);
        }
        if sync {
            let layout = self.layout();
            self.push_layout(Some(&layout)).await?;
        }
        Ok(())
    }

    /// Remove all components from the message; its content stays.
    ///
    /// Without `sync` nothing happens: the components are still on screen,
    /// so the view keeps routing.
    pub async fn close_view(&mut self, sync: bool) -> anyhow::Result<()> {
        if !sync {
            tracing::trace!("{} close skipped (no sync)", self.id);
            return Ok(());
        }
        self.mark_closed();
        self.push_layout(None).await
    }

    /// Delete the message, or the interaction response if no message is
    /// bound. Like [`close_view`](Self::close_view), a no-op without `sync`.
    pub async fn close_and_delete(&mut self, sync: bool) -> anyhow::Result<()> {
        if !sync {
            tracing::trace!("{} delete skipped (no sync)", self.id);
            return Ok(());
        }
        self.mark_closed();
        if let Some(message) = &self.message {
            message.delete().await
        } else if let Some(interaction) = &self.interaction {
            interaction.delete_response().await
        } else {
            tracing::trace!("{} has nothing bound to delete", self.id);
            Ok(())
        }
    }

    fn mark_closed(&mut self) {
        self.closed = true;
        self.sync_route();
    }

    /// Edit the bound message, else the interaction's original response
    async fn push_layout(&self, layout: Option<&ViewLayout>) -> anyhow::Result<()> {
        if let Some(message) = &self.message {
            message.edit(layout).await
        } else if let Some(interaction) = &self.interaction {
            interaction.edit_original_response(layout).await
        } else {
            tracing::trace!("{} has nothing bound to edit", self.id);
            Ok(())
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Publishing and routing
    // ─────────────────────────────────────────────────────────────────────

    /// Send the view as a new message and bind it
    pub async fn send(mut self, messenger: &dyn Messenger, content: &str) -> anyhow::Result<ViewHandle> {
        let layout = self.layout();
        let message = messenger.send_message(content, Some(&layout)).await?;
        tracing::debug!("{} sent with {} component(s)", self.id, self.components.len());
        self.message = Some(message);
        self.touch(Instant::now());
        Ok(self.into_handle())
    }

    /// Show the view as the interaction's response and bind the interaction
    pub async fn respond(mut self, interaction: Arc<dyn Interaction>) -> anyhow::Result<ViewHandle> {
        let layout = self.layout();
        interaction.edit_original_response(Some(&layout)).await?;
        tracing::debug!("{} attached to interaction response", self.id);
        self.interaction = Some(interaction);
        self.touch(Instant::now());
        Ok(self.into_handle())
    }

    pub fn into_handle(self) -> ViewHandle {
        Arc::new(tokio::sync::Mutex::new(self))
    }

    pub(crate) fn route_keys(&self) -> SharedRouteKeys {
        self.route.clone()
    }

    fn sync_route(&self) {
        let keys = RouteKeys {
            custom_ids: self.custom_ids().into_iter().map(str::to_string).collect(),
            message_id: self.message_id(),
            closed: self.closed,
            deadline: self
                .timeout
                .and_then(|timeout| self.last_activity.checked_add(timeout)),
        };
        *self.route.lock() = keys;
    }

    /// Let the component owning the event's custom id record the event and
    /// return the callbacks to run. Disabled components still resolve.
    pub(crate) fn resolve(&mut self, event: &InteractionEvent) -> Option<Vec<Invocation>> {
        let custom_id = event.custom_id();
        self.components
            .iter_mut()
            .find(|c| has_custom_id(c.custom_id(), custom_id))
            .map(|c| c.resolve(event))
    }
}

fn has_custom_id(id: Option<&CustomId>, custom_id: &str) -> bool {
    id.is_some_and(|id| id.as_str() == custom_id)
}
