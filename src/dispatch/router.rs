//! Router: finds the view or modal an interaction belongs to and runs its
//! callbacks
//!
//! Routing reads each view's shared route keys (custom ids, bound message,
//! closed flag, deadline) and never locks a view to decide. Only the target
//! view is locked, for the authorization gate and to resolve the component,
//! so a view that is busy in a slow host call does not hold up the others.

use super::{run_isolated, ComponentContext, Invocation, ModalContext, Outcome};
use crate::error::ViewError;
use crate::events::{InteractionEvent, UserId};
use crate::host::{Interaction, Messenger};
use crate::view::{Modal, SharedRouteKeys, View, ViewHandle};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Modals are keyed by custom id and, when the modal has an author, by that
/// user, so two users can have the same form open at once.
type ModalKey = (String, Option<UserId>);

struct Route {
    view: ViewHandle,
    keys: SharedRouteKeys,
}

#[derive(Default)]
struct Registry {
    routes: Mutex<Vec<Route>>,
    modals: Mutex<HashMap<ModalKey, Modal>>,
}

/// Two views may share a custom id only when both sit on known, different
/// messages.
fn distinguishable(a: Option<u64>, b: Option<u64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a != b)
}

/// Routes interactions to published views and open modals
///
/// Cheap to clone; clones share one registry. The registry locks are never
/// held across an `.await`.
#[derive(Clone, Default)]
pub struct Router {
    registry: Arc<Registry>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("views", &self.view_count())
            .field("modals", &self.open_modal_count())
            .finish()
    }
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    fn routes(&self) -> MutexGuard<'_, Vec<Route>> {
        self.registry
            .routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn modals(&self) -> MutexGuard<'_, HashMap<ModalKey, Modal>> {
        self.registry
            .modals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Start routing interactions to `view`. Registering twice is a no-op.
    ///
    /// Fails if one of the view's custom ids is already routed to a live
    /// view and the two cannot be told apart by message id. Locks `view`
    /// briefly, so do not call it while holding that lock.
    pub async fn register(&self, view: ViewHandle) -> Result<(), ViewError> {
        let keys = view.lock().await.route_keys();
        self.insert(view, keys)
    }

    fn insert(&self, view: ViewHandle, keys: SharedRouteKeys) -> Result<(), ViewError> {
        let now = Instant::now();
        let mut routes = self.routes();
        if routes.iter().any(|r| Arc::ptr_eq(&r.view, &view)) {
            return Ok(());
        }

        let new = keys.lock().clone();
        for route in routes.iter() {
            let other = route.keys.lock();
            if !other.is_live(now) || distinguishable(other.message_id, new.message_id) {
                continue;
            }
            if let Some(id) = new.custom_ids.iter().find(|id| other.owns(id)) {
                tracing::warn!("Refusing view: custom id '{}' is already routed", id);
                return Err(ViewError::DuplicateCustomId(id.clone()));
            }
        }

        routes.push(Route { view, keys });
        tracing::debug!("Registered view ({} live)", routes.len());
        Ok(())
    }

    /// Stop routing to `view`. Returns false if it was not registered.
    pub fn unregister(&self, view: &ViewHandle) -> bool {
        let mut routes = self.routes();
        let before = routes.len();
        routes.retain(|r| !Arc::ptr_eq(&r.view, view));
        routes.len() != before
    }

    /// Send `view` as a new message and register it.
    ///
    /// If the view cannot be registered its components are removed from the
    /// sent message again, so nothing unroutable stays on screen.
    pub async fn publish(
        &self,
        view: View,
        messenger: &dyn Messenger,
        content: &str,
    ) -> anyhow::Result<ViewHandle> {
        let keys = view.route_keys();
        let handle = view.send(messenger, content).await?;
        self.insert_or_strip(handle, keys).await
    }

    /// Answer an interaction with `view` (editing the original response)
    /// and register it
    pub async fn publish_response(
        &self,
        view: View,
        interaction: Arc<dyn Interaction>,
    ) -> anyhow::Result<ViewHandle> {
        let keys = view.route_keys();
        let handle = view.respond(interaction).await?;
        self.insert_or_strip(handle, keys).await
    }

    async fn insert_or_strip(
        &self,
        handle: ViewHandle,
        keys: SharedRouteKeys,
    ) -> anyhow::Result<ViewHandle> {
        if let Err(e) = self.insert(handle.clone(), keys) {
            if let Err(strip) = handle.lock().await.close_view(true).await {
                tracing::warn!("Failed to strip unroutable view: {:#}", strip);
            }
            return Err(e.into());
        }
        Ok(handle)
    }

    /// Show `modal` in response to an interaction and route its submission.
    /// Opening a modal with the same id for the same author replaces it.
    pub async fn open_modal(&self, responder: &dyn Interaction, modal: Modal) -> anyhow::Result<()> {
        responder.respond_with_modal(&modal.layout()).await?;
        let key = (
            modal.custom_id().to_string(),
            modal.author().map(|user| user.id),
        );
        tracing::debug!("Opened modal '{}'", key.0);
        if self.modals().insert(key.clone(), modal).is_some() {
            tracing::warn!(
                "Modal '{}' replaced an open modal with the same id and author",
                key.0
            );
        }
        Ok(())
    }

    /// Registered views, including closed or expired ones not yet pruned
    pub fn view_count(&self) -> usize {
        self.routes().len()
    }

    pub fn open_modal_count(&self) -> usize {
        self.modals().len()
    }

    /// Route one interaction
    pub async fn dispatch(&self, event: InteractionEvent) -> Outcome {
        if event.is_modal_submit() {
            self.submit_modal(event).await
        } else {
            self.dispatch_component(event).await
        }
    }

    /// Drop dead routes and pick the view owning the event's custom id.
    /// With a message id on the event, a view on that message wins over
    /// views whose message is unknown.
    fn find_target(&self, event: &InteractionEvent, now: Instant) -> Option<ViewHandle> {
        let custom_id = event.custom_id();
        let mut routes = self.routes();

        let before = routes.len();
        routes.retain(|r| r.keys.lock().is_live(now));
        if routes.len() != before {
            tracing::debug!(
                "Pruned {} closed or expired view(s)",
                before - routes.len()
            );
        }

        let owners: Vec<(&Route, Option<u64>)> = routes
            .iter()
            .filter_map(|r| {
                let keys = r.keys.lock();
                keys.owns(custom_id).then_some((r, keys.message_id))
            })
            .collect();

        let candidates: Vec<&Route> = match event.message_id {
            Some(origin) if owners.iter().any(|(_, m)| *m == Some(origin)) => owners
                .iter()
                .filter(|(_, m)| *m == Some(origin))
                .map(|(r, _)| *r)
                .collect(),
            Some(_) => owners
                .iter()
                .filter(|(_, m)| m.is_none())
                .map(|(r, _)| *r)
                .collect(),
            None => owners.iter().map(|(r, _)| *r).collect(),
        };

        match candidates.as_slice() {
            [] => None,
            [route] => Some(route.view.clone()),
            _ => {
                tracing::warn!(
                    "{} views own custom id '{}' and the event names no message to pick one",
                    candidates.len(),
                    custom_id
                );
                None
            }
        }
    }

    async fn dispatch_component(&self, event: InteractionEvent) -> Outcome {
        let now = Instant::now();
        let Some(handle) = self.find_target(&event, now) else {
            tracing::trace!("No view owns custom id '{}'", event.custom_id());
            return Outcome::Unrouted;
        };

        let invocations: Vec<Invocation> = {
            let mut view = handle.lock().await;
            // The view may have changed while we waited for it
            if view.is_closed() || !view.contains_custom_id(event.custom_id()) {
                return Outcome::Unrouted;
            }
            if !view.interaction_authorized(&event).await {
                tracing::debug!(
                    "User {} rejected by view {} for '{}'",
                    event.user.id,
                    view.id(),
                    event.custom_id()
                );
                return Outcome::Rejected;
            }
            view.touch(Instant::now());
            match view.resolve(&event) {
                Some(invocations) => invocations,
                None => return Outcome::Unrouted,
            }
        };

        let ctx = ComponentContext {
            event,
            view: handle,
            router: self.clone(),
        };
        let mut failed = 0;
        for invocation in &invocations {
            if !run_isolated(invocation.source(), invocation.callback(), ctx.clone()).await {
                failed += 1;
            }
        }
        Outcome::Handled {
            invoked: invocations.len(),
            failed,
        }
    }

    async fn submit_modal(&self, event: InteractionEvent) -> Outcome {
        let custom_id = event.custom_id().to_string();
        let taken = {
            let mut modals = self.modals();
            let found = modals
                .remove(&(custom_id.clone(), Some(event.user.id)))
                .or_else(|| modals.remove(&(custom_id.clone(), None)));
            match found {
                Some(modal) => Ok(modal),
                None => Err(modals.keys().any(|(id, _)| *id == custom_id)),
            }
        };

        let mut modal = match taken {
            Ok(modal) => modal,
            Err(true) => {
                tracing::debug!(
                    "User {} rejected by modal '{}'",
                    event.user.id,
                    custom_id
                );
                return Outcome::Rejected;
            }
            Err(false) => {
                tracing::trace!("No open modal with custom id '{}'", custom_id);
                return Outcome::Unrouted;
            }
        };

        modal.apply_submission(&event);
        let Some(callback) = modal.callback().cloned() else {
            return Outcome::Handled {
                invoked: 0,
                failed: 0,
            };
        };

        let ctx = ModalContext {
            view: modal.parent_view().cloned(),
            modal,
            event,
            router: self.clone(),
        };
        let ok = run_isolated(&custom_id, &callback, ctx).await;
        Outcome::Handled {
            invoked: 1,
            failed: usize::from(!ok),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Button, Select, SelectOption, SelectTrigger, TextInput};
    use crate::dispatch::{Callback, ComponentCallback};
    use crate::events::{SubmittedField, User};
    use crate::host::recording::{HostCall, RecordingHost};
    use crate::host::{Message, ViewLayout};
    use crate::logging::{CaptureLayer, LogBuffer, LogLevel};
    use crate::view::{RespondTarget, UsedBehavior};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;
    use tracing_subscriber::layer::SubscriberExt;

    fn alice() -> User {
        User::new(1, "alice")
    }

    fn bob() -> User {
        User::new(2, "bob")
    }

    fn counting(hits: &Arc<AtomicUsize>) -> ComponentCallback {
        let hits = hits.clone();
        Callback::sync(move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[tokio::test]
    async fn test_end_to_end_confirm_button() {
        let host = RecordingHost::new();
        let router = Router::new();
        let seen: Arc<Mutex<Option<(String, ViewHandle)>>> = Arc::new(Mutex::new(None));

        let mut view = View::new();
        view.set_prefix("order42", true);
        view.set_author(alice(), false);
        let sink = seen.clone();
        view.add_component(Button::new("Confirm").on_click(Callback::sync(move |ctx: ComponentContext| {
            *sink.lock().unwrap() = Some((ctx.event.custom_id().to_string(), ctx.view.clone()));
            Ok(())
        })))
        .unwrap();
        assert_eq!(view.custom_ids(), ["order42-0"]);

        let handle = router.publish(view, &host, "Confirm order?").await.unwrap();
        let outcome = router
            .dispatch(InteractionEvent::click(alice(), "order42-0"))
            .await;
        assert_eq!(
            outcome,
            Outcome::Handled {
                invoked: 1,
                failed: 0
            }
        );

        let (custom_id, view) = seen.lock().unwrap().take().expect("callback ran");
        assert_eq!(custom_id, "order42-0");
        assert!(Arc::ptr_eq(&view, &handle), "Callback gets the owning view");
        assert!(!handle.lock().await.is_used(), "Single response is off by default");
    }

    #[tokio::test]
    async fn test_author_restriction_blocks_callbacks() {
        let host = RecordingHost::new();
        let router = Router::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let mut view = View::new();
        view.set_author(alice(), true);
        view.add_component(Button::new("Mine").set_custom_id("mine").on_click(counting(&hits)))
            .unwrap();
        router.publish(view, &host, "only alice").await.unwrap();

        let outcome = router.dispatch(InteractionEvent::click(bob(), "mine")).await;
        assert_eq!(outcome, Outcome::Rejected);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        let outcome = router.dispatch(InteractionEvent::click(alice(), "mine")).await;
        assert!(outcome.was_handled());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_custom_id_is_unrouted() {
        let router = Router::new();
        let outcome = router.dispatch(InteractionEvent::click(alice(), "nope")).await;
        assert_eq!(outcome, Outcome::Unrouted);
    }

    #[tokio::test]
    async fn test_select_dispatch_runs_trigger_and_option_callbacks() {
        let host = RecordingHost::new();
        let router = Router::new();
        let menu_hits = Arc::new(AtomicUsize::new(0));
        let b_hits = Arc::new(AtomicUsize::new(0));

        let mut view = View::new();
        view.add_component(
            Select::new()
                .set_custom_id("menu")
                .set_min_values(2)
                .set_max_values(2)
                .set_trigger(SelectTrigger::MinAndMax)
                .add_option(SelectOption::new("a"))
                .add_option(SelectOption::new("b").on_select(counting(&b_hits)))
                .on_select(counting(&menu_hits)),
        )
        .unwrap();
        let handle = router.publish(view, &host, "pick two").await.unwrap();

        let outcome = router
            .dispatch(InteractionEvent::select(alice(), "menu", ["a", "b"]))
            .await;
        assert_eq!(outcome.invoked(), 2);
        assert_eq!(menu_hits.load(Ordering::SeqCst), 1);
        assert_eq!(b_hits.load(Ordering::SeqCst), 1);

        let outcome = router
            .dispatch(InteractionEvent::select(alice(), "menu", ["a"]))
            .await;
        assert_eq!(outcome.invoked(), 0, "One value does not meet MinAndMax");
        assert_eq!(menu_hits.load(Ordering::SeqCst), 1);

        assert_eq!(handle.lock().await.values_at(0).unwrap(), ["a"]);
    }

    #[tokio::test]
    async fn test_failing_callback_is_logged_and_suppressed() {
        let buffer = LogBuffer::new();
        let subscriber = tracing_subscriber::registry().with(CaptureLayer::new(buffer.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let host = RecordingHost::new();
        let router = Router::new();
        let after = Arc::new(AtomicUsize::new(0));

        let mut view = View::new();
        view.add_component(
            Select::new()
                .set_custom_id("menu")
                .add_option(SelectOption::new("x").on_select(counting(&after)))
                .on_select(Callback::sync(|_| anyhow::bail!("database unavailable"))),
        )
        .unwrap();
        router.publish(view, &host, "menu").await.unwrap();

        let outcome = router
            .dispatch(InteractionEvent::select(alice(), "menu", ["x"]))
            .await;
        assert_eq!(
            outcome,
            Outcome::Handled {
                invoked: 2,
                failed: 1
            }
        );
        assert_eq!(after.load(Ordering::SeqCst), 1, "Later callbacks still run");

        let errors = buffer.entries_at(LogLevel::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("database unavailable"));
    }

    #[tokio::test]
    async fn test_one_shot_close_prunes_view() {
        let host = RecordingHost::new();
        let router = Router::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let mut view = View::new();
        view.set_only_one_response(true);
        view.set_used_behavior(UsedBehavior::ViewClose);
        view.set_respond_target(RespondTarget::AllUsers);
        view.add_component(Button::new("Once").set_custom_id("once").on_click(counting(&hits)))
            .unwrap();
        router.publish(view, &host, "once").await.unwrap();

        assert!(router
            .dispatch(InteractionEvent::click(alice(), "once"))
            .await
            .was_handled());
        assert_eq!(hits.load(Ordering::SeqCst), 1, "The consuming click still runs");
        assert!(matches!(
            host.last_call(),
            Some(HostCall::Edit { layout: None, .. })
        ));

        let outcome = router.dispatch(InteractionEvent::click(bob(), "once")).await;
        assert_eq!(outcome, Outcome::Unrouted);
        assert_eq!(router.view_count(), 0);
    }

    #[tokio::test]
    async fn test_expired_view_is_pruned() {
        let host = RecordingHost::new();
        let router = Router::new();

        let mut view = View::new();
        view.set_timeout(Some(Duration::ZERO));
        view.add_component(Button::new("Late").set_custom_id("late"))
            .unwrap();
        router.publish(view, &host, "late").await.unwrap();

        let outcome = router.dispatch(InteractionEvent::click(alice(), "late")).await;
        assert_eq!(outcome, Outcome::Unrouted);
        assert_eq!(router.view_count(), 0);
    }

    #[tokio::test]
    async fn test_register_is_idempotent() {
        let router = Router::new();
        let mut view = View::new();
        view.add_component(Button::new("a")).unwrap();
        let handle = view.into_handle();
        router.register(handle.clone()).await.unwrap();
        router.register(handle.clone()).await.unwrap();
        assert_eq!(router.view_count(), 1);
        assert!(router.unregister(&handle));
        assert!(!router.unregister(&handle));
    }

    #[tokio::test]
    async fn test_register_refuses_ids_without_origin() {
        let router = Router::new();
        let mut first = View::new();
        first.add_component(Button::new("a")).unwrap();
        let mut second = View::new();
        second.add_component(Button::new("b")).unwrap();

        router.register(first.into_handle()).await.unwrap();
        let err = router.register(second.into_handle()).await.unwrap_err();
        assert_eq!(err, ViewError::DuplicateCustomId("0".to_string()));
        assert_eq!(router.view_count(), 1);
    }

    #[tokio::test]
    async fn test_default_ids_route_by_message() {
        let host = RecordingHost::new();
        let router = Router::new();
        let a_hits = Arc::new(AtomicUsize::new(0));
        let b_hits = Arc::new(AtomicUsize::new(0));

        let mut a = View::new();
        a.set_author(alice(), true);
        a.add_component(Button::new("A").on_click(counting(&a_hits)))
            .unwrap();
        let mut b = View::new();
        b.add_component(Button::new("B").on_click(counting(&b_hits)))
            .unwrap();
        assert_eq!(a.custom_ids(), b.custom_ids());

        let a = router.publish(a, &host, "a").await.unwrap();
        let b = router.publish(b, &host, "b").await.unwrap();
        let a_msg = a.lock().await.message_id().unwrap();
        let b_msg = b.lock().await.message_id().unwrap();

        let outcome = router
            .dispatch(InteractionEvent::click(bob(), "0").on_message(b_msg))
            .await;
        assert!(outcome.was_handled(), "Got {:?}", outcome);
        assert_eq!(b_hits.load(Ordering::SeqCst), 1);
        assert_eq!(a_hits.load(Ordering::SeqCst), 0);

        let outcome = router
            .dispatch(InteractionEvent::click(bob(), "0").on_message(a_msg))
            .await;
        assert_eq!(outcome, Outcome::Rejected, "A is still alice-only");

        let outcome = router
            .dispatch(InteractionEvent::click(alice(), "0").on_message(a_msg))
            .await;
        assert!(outcome.was_handled());
        assert_eq!(a_hits.load(Ordering::SeqCst), 1);
        assert_eq!(b_hits.load(Ordering::SeqCst), 1);

        // Without an origin the click is ambiguous and nothing runs
        let outcome = router.dispatch(InteractionEvent::click(alice(), "0")).await;
        assert_eq!(outcome, Outcome::Unrouted);
        assert_eq!(a_hits.load(Ordering::SeqCst) + b_hits.load(Ordering::SeqCst), 2);
    }

    /// A message whose edit blocks until released
    #[derive(Debug, Default)]
    struct StalledMessage {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl Message for StalledMessage {
        fn id(&self) -> Option<u64> {
            Some(900)
        }

        async fn edit(&self, _layout: Option<&ViewLayout>) -> anyhow::Result<()> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(())
        }

        async fn delete(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_busy_view_does_not_block_other_views() {
        let router = Router::new();
        let stalled = Arc::new(StalledMessage::default());
        let hits = Arc::new(AtomicUsize::new(0));

        let mut slow = View::new();
        slow.set_only_one_response(true);
        slow.set_used_behavior(UsedBehavior::DisableItems);
        slow.set_message(stalled.clone());
        slow.add_component(Button::new("Slow").set_custom_id("slow"))
            .unwrap();
        router.register(slow.into_handle()).await.unwrap();

        let mut quick = View::new();
        quick
            .add_component(Button::new("Quick").set_custom_id("quick").on_click(counting(&hits)))
            .unwrap();
        router.register(quick.into_handle()).await.unwrap();

        let background = router.clone();
        let slow_click = tokio::spawn(async move {
            background
                .dispatch(InteractionEvent::click(alice(), "slow"))
                .await
        });
        stalled.entered.notified().await;

        let outcome = tokio::time::timeout(
            Duration::from_millis(300),
            router.dispatch(InteractionEvent::click(bob(), "quick")),
        )
        .await
        .expect("dispatch to an idle view must not wait on a busy one");
        assert!(outcome.was_handled());
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        stalled.release.notify_one();
        assert!(slow_click.await.unwrap().was_handled());
    }

    #[tokio::test]
    async fn test_close_without_sync_keeps_routing() {
        let host = RecordingHost::new();
        let router = Router::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let mut view = View::new();
        view.add_component(Button::new("a").set_custom_id("a").on_click(counting(&hits)))
            .unwrap();
        let handle = router.publish(view, &host, "a").await.unwrap();
        handle.lock().await.close_view(false).await.unwrap();

        let outcome = router.dispatch(InteractionEvent::click(alice(), "a")).await;
        assert!(outcome.was_handled(), "Got {:?}", outcome);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(router.view_count(), 1);
    }

    #[tokio::test]
    async fn test_only_max_trigger_through_router() {
        let host = RecordingHost::new();
        let router = Router::new();
        let menu_hits = Arc::new(AtomicUsize::new(0));

        let mut view = View::new();
        view.add_component(
            Select::new()
                .set_custom_id("menu")
                .set_min_values(1)
                .set_max_values(3)
                .set_trigger(SelectTrigger::OnlyMax)
                .add_options([
                    SelectOption::new("a"),
                    SelectOption::new("b"),
                    SelectOption::new("c"),
                ])
                .on_select(counting(&menu_hits)),
        )
        .unwrap();
        let handle = router.publish(view, &host, "up to three").await.unwrap();

        let outcome = router
            .dispatch(InteractionEvent::select(alice(), "menu", ["a", "b"]))
            .await;
        assert_eq!(outcome.invoked(), 0, "Two of three does not meet OnlyMax");
        assert_eq!(handle.lock().await.values_at(0).unwrap(), ["a", "b"]);

        let outcome = router
            .dispatch(InteractionEvent::select(alice(), "menu", ["a", "b", "c"]))
            .await;
        assert_eq!(outcome.invoked(), 1);
        assert_eq!(menu_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reopening_modal_id_warns() {
        let buffer = LogBuffer::new();
        let subscriber = tracing_subscriber::registry().with(CaptureLayer::new(buffer.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let host = RecordingHost::new();
        let router = Router::new();
        let interaction = host.interaction();
        router
            .open_modal(&*interaction, Modal::new("First"))
            .await
            .unwrap();
        assert!(buffer.entries_at(LogLevel::Warn).is_empty());

        router
            .open_modal(&*interaction, Modal::new("Second"))
            .await
            .unwrap();
        assert_eq!(router.open_modal_count(), 1);
        let warnings = buffer.entries_at(LogLevel::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("modal"));
    }

    async fn open_feedback(ctx: ComponentContext) -> anyhow::Result<()> {
        let mut modal = Modal::new("Feedback");
        modal.set_custom_id("feedback");
        modal.set_author(ctx.event.user.clone());
        modal.set_parent_view(ctx.view.clone());
        modal.add_input(TextInput::new("Comment"))?;
        modal.on_submit(Callback::sync(|ctx: ModalContext| {
            let value = ctx.modal.value_at(0)?.unwrap_or_default();
            anyhow::ensure!(value == "great", "unexpected value {:?}", value);
            Ok(())
        }));
        ctx.open_modal(modal).await
    }

    #[tokio::test]
    async fn test_modal_round_trip() {
        let host = RecordingHost::new();
        let router = Router::new();

        let mut view = View::new();
        view.add_component(
            Button::new("Feedback")
                .set_custom_id("open")
                .on_click(Callback::new(open_feedback)),
        )
        .unwrap();
        router.publish(view, &host, "tell us").await.unwrap();

        let click = InteractionEvent::click(alice(), "open").with_responder(host.interaction());
        assert_eq!(
            router.dispatch(click).await,
            Outcome::Handled {
                invoked: 1,
                failed: 0
            }
        );
        assert!(matches!(
            host.last_call(),
            Some(HostCall::RespondWithModal { .. })
        ));
        assert_eq!(router.open_modal_count(), 1);

        // Someone else cannot submit alice's form
        let stolen = InteractionEvent::submit(bob(), "feedback", vec![SubmittedField::new("0", "x")]);
        assert_eq!(router.dispatch(stolen).await, Outcome::Rejected);

        let submit =
            InteractionEvent::submit(alice(), "feedback", vec![SubmittedField::new("0", "great")]);
        assert_eq!(
            router.dispatch(submit.clone()).await,
            Outcome::Handled {
                invoked: 1,
                failed: 0
            }
        );
        assert_eq!(router.open_modal_count(), 0, "Modals are single-use");
        assert_eq!(router.dispatch(submit).await, Outcome::Unrouted);
    }

    #[tokio::test]
    async fn test_open_modal_without_responder_fails() {
        let host = RecordingHost::new();
        let router = Router::new();

        let mut view = View::new();
        view.add_component(
            Button::new("Feedback")
                .set_custom_id("open")
                .on_click(Callback::new(open_feedback)),
        )
        .unwrap();
        router.publish(view, &host, "tell us").await.unwrap();

        let outcome = router.dispatch(InteractionEvent::click(alice(), "open")).await;
        assert_eq!(
            outcome,
            Outcome::Handled {
                invoked: 1,
                failed: 1
            }
        );
        assert_eq!(router.open_modal_count(), 0);
    }
}
