//! Callback contract
//!
//! Every callback returns a task. Async callbacks are awaited; sync
//! callbacks run to completion when called and hand back an already
//! finished task, so the router treats both the same way.

use super::Router;
use crate::error::ViewError;
use crate::events::InteractionEvent;
use crate::view::{Modal, ViewHandle};
use futures::future::{self, BoxFuture, FutureExt};
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Task returned by a callback
pub type CallbackFuture = BoxFuture<'static, anyhow::Result<()>>;

/// A shareable callback taking a context of type `C`
pub struct Callback<C> {
    f: Arc<dyn Fn(C) -> CallbackFuture + Send + Sync>,
}

impl<C: Send + 'static> Callback<C> {
    /// Async callback
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(C) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            f: Arc::new(move |ctx| f(ctx).boxed()),
        }
    }

    /// Sync callback; runs inside `call`
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(C) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            f: Arc::new(move |ctx| future::ready(f(ctx)).boxed()),
        }
    }

    pub fn call(&self, ctx: C) -> CallbackFuture {
        (self.f)(ctx)
    }
}

impl<C> Clone for Callback<C> {
    fn clone(&self) -> Self {
        Self { f: self.f.clone() }
    }
}

impl<C> fmt::Debug for Callback<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

/// What a button or select callback receives
#[derive(Debug, Clone)]
pub struct ComponentContext {
    pub event: InteractionEvent,
    /// The view that owns the component
    pub view: ViewHandle,
    pub router: Router,
}

impl ComponentContext {
    /// Answer this interaction with a modal and route its submission
    pub async fn open_modal(&self, modal: Modal) -> anyhow::Result<()> {
        let responder = self
            .event
            .responder
            .as_deref()
            .ok_or(ViewError::NoInteraction)?;
        self.router.open_modal(responder, modal).await
    }
}

/// What a modal callback receives
#[derive(Debug, Clone)]
pub struct ModalContext {
    pub event: InteractionEvent,
    /// The view the modal was opened from, if any
    pub view: Option<ViewHandle>,
    /// The modal with submitted values filled in
    pub modal: Modal,
    pub router: Router,
}

pub type ComponentCallback = Callback<ComponentContext>;
pub type ModalCallback = Callback<ModalContext>;

/// Run a callback at the dispatch boundary.
///
/// Errors and panics are logged and swallowed so one bad callback cannot take
/// down the event loop. Returns whether the callback succeeded.
pub(crate) async fn run_isolated<C: Send + 'static>(
    source: &str,
    callback: &Callback<C>,
    ctx: C,
) -> bool {
    let task = match std::panic::catch_unwind(AssertUnwindSafe(|| callback.call(ctx))) {
        Ok(task) => task,
        Err(panic) => {
            tracing::error!(
                "Callback for '{}' panicked: {}",
                source,
                panic_message(panic.as_ref())
            );
            return false;
        }
    };

    match AssertUnwindSafe(task).catch_unwind().await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::error!("Callback for '{}' failed: {:#}", source, e);
            false
        }
        Err(panic) => {
            tracing::error!(
                "Callback for '{}' panicked: {}",
                source,
                panic_message(panic.as_ref())
            );
            false
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
