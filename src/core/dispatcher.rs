//! # Dispatcher - registry owner and emission engine.
//!
//! [`Dispatcher`] maps event keys to ordered handler lists and triggers them:
//!
//! ```text
//! subscribe(key, h) ──► [RwLock<Registry>] ◄── unsubscribe(key, h?)
//!                               │
//!                          snapshot(key)          (lock released here)
//!                               │
//!          ┌────────────────────┼─────────────────────────┐
//!          ▼                    ▼                         ▼
//!     emit_sync            emit_async(Concurrent)    emit_async(Sequential)
//!   h1 ─► h2 ─► ..         h1 ┐                     h1.await ─► h2.await ─► ..
//!   Ready(Err) aborts      h2 ┼─► join_all          first Err returned as-is
//!   Pending is detached    hN ┘   errors ─► Aggregate
//! ```
//!
//! ## Rules
//! - Handler lists are snapshotted before dispatch; handlers may (un)subscribe
//!   while an emission is in flight without affecting it.
//! - The dispatcher never retries and never logs handler failures; they are
//!   returned to the emitter.
//! - Panics in synchronous emission propagate. Panics while driving an async
//!   emission are caught and reported as [`HandlerPanicked`].

use std::any::Any;
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::panic::AssertUnwindSafe;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures::FutureExt;
use futures::future::join_all;

use crate::core::builder::DispatcherBuilder;
use crate::core::config::DispatcherConfig;
use crate::core::mode::EmitMode;
use crate::core::registry::{Insert, Registry};
use crate::error::{AggregateFailure, DispatchError, EmitError, HandlerError, HandlerPanicked};
use crate::handlers::{BoxHandlerFuture, HandlerRef, Invocation};

/// In-process publish/subscribe dispatcher.
///
/// - `K`: event key (only hashed and compared)
/// - `C`: carrier forwarded untouched as the first handler argument
/// - `P`: payload forwarded as the second handler argument
///
/// Share it behind an `Arc`; all operations take `&self`.
///
/// # Example
/// ```
/// use emitvisor::{Dispatcher, HandlerRef, SyncHandlerFn};
///
/// let bus: Dispatcher<&'static str, (), u32> = Dispatcher::new();
/// let h: HandlerRef<(), u32> = SyncHandlerFn::arc("print", |_ctx: (), n: u32| {
///     println!("got {n}");
///     Ok::<_, std::io::Error>(())
/// });
///
/// bus.subscribe("tick", h.clone()).unwrap();
/// bus.subscribe("tick", h.clone()).unwrap(); // same handler: no-op
/// assert_eq!(bus.handler_count("tick"), 1);
///
/// bus.emit_sync("tick", (), 1).unwrap();
/// ```
pub struct Dispatcher<K, C, P> {
    cfg: DispatcherConfig,
    registry: RwLock<Registry<K, C, P>>,
}

impl<K, C, P> Dispatcher<K, C, P>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
    C: Clone + Send + 'static,
    P: Clone + Send + 'static,
{
    /// Creates an empty dispatcher with the default config.
    pub fn new() -> Self {
        Self::from_parts(DispatcherConfig::default(), Registry::new())
    }

    /// Creates an empty dispatcher, validating `cfg`.
    pub fn with_config(cfg: DispatcherConfig) -> Result<Self, DispatchError<K>> {
        cfg.validate()?;
        Ok(Self::from_parts(cfg, Registry::new()))
    }

    /// Starts a builder for a pre-seeded dispatcher.
    pub fn builder(cfg: DispatcherConfig) -> DispatcherBuilder<K, C, P> {
        DispatcherBuilder::new(cfg)
    }

    pub(crate) fn from_parts(cfg: DispatcherConfig, registry: Registry<K, C, P>) -> Self {
        Self {
            cfg,
            registry: RwLock::new(registry),
        }
    }

    /// The options captured at construction.
    pub fn config(&self) -> &DispatcherConfig {
        &self.cfg
    }

    /// Registers `handler` for `key`.
    ///
    /// Subscribing a handler that is already present is a no-op. Fails with
    /// [`DispatchError::HandlerLimitExceeded`] when the key's list is full;
    /// the list is left unchanged.
    pub fn subscribe(&self, key: K, handler: HandlerRef<C, P>) -> Result<(), DispatchError<K>> {
        let limit = self.cfg.max_handlers_per_key;
        let name = handler.name().to_owned();
        let outcome = self.write().insert(key.clone(), handler, limit);

        match outcome {
            Insert::Added => {
                tracing::debug!(key = ?key, handler = %name, "handler subscribed");
                Ok(())
            }
            Insert::AlreadyPresent => {
                tracing::trace!(key = ?key, handler = %name, "handler already subscribed");
                Ok(())
            }
            Insert::LimitReached => Err(DispatchError::HandlerLimitExceeded { key, limit }),
        }
    }

    /// Registers a dynamically typed value, checking that it is a handler.
    ///
    /// The value must be a [`HandlerRef<C, P>`]; anything else fails with
    /// [`DispatchError::InvalidHandler`] and leaves the registry untouched.
    pub fn subscribe_any(
        &self,
        key: K,
        candidate: Box<dyn Any + Send + Sync>,
    ) -> Result<(), DispatchError<K>> {
        match candidate.downcast::<HandlerRef<C, P>>() {
            Ok(handler) => self.subscribe(key, *handler),
            Err(_) => Err(DispatchError::InvalidHandler { key }),
        }
    }

    /// Removes `handler` from `key`. Returns `true` if it was registered.
    ///
    /// Removing an absent handler, or from an unknown key, is not an error.
    pub fn unsubscribe<Q>(&self, key: &Q, handler: &HandlerRef<C, P>) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let removed = self.write().remove(key, handler);
        if removed {
            tracing::debug!(key = ?key, handler = %handler.name(), "handler unsubscribed");
        }
        removed
    }

    /// Removes every handler for `key`. Returns how many were removed.
    pub fn unsubscribe_all<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let removed = self.write().remove_all(key);
        if removed > 0 {
            tracing::debug!(key = ?key, removed, "all handlers unsubscribed");
        }
        removed
    }

    /// Invokes every handler of `key` in order, synchronously.
    ///
    /// - A handler returning [`Invocation::Ready`] with an error aborts the loop;
    ///   later handlers are not invoked and the error is returned unchanged.
    /// - A handler returning [`Invocation::Pending`] is not awaited: its future is
    ///   detached onto the current Tokio runtime (or a dedicated thread outside
    ///   one) and its outcome is discarded.
    /// - Panics propagate to the caller.
    pub fn emit_sync<Q>(&self, key: &Q, carrier: C, payload: P) -> Result<(), HandlerError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let handlers = self.snapshot(key);
        tracing::trace!(key = ?key, handlers = handlers.len(), "emit_sync");

        for handler in &handlers {
            match handler.call(carrier.clone(), payload.clone()) {
                Invocation::Ready(res) => res?,
                Invocation::Pending(fut) => detach(handler.name(), fut),
            }
        }
        Ok(())
    }

    /// Invokes every handler of `key` concurrently and waits for all of them.
    ///
    /// Shorthand for [`emit_async_with_mode`](Self::emit_async_with_mode) with
    /// [`EmitMode::Concurrent`].
    pub async fn emit_async<Q>(&self, key: &Q, carrier: C, payload: P) -> Result<(), EmitError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + Sync + ?Sized,
    {
        self.emit_async_with_mode(key, carrier, payload, EmitMode::Concurrent)
            .await
    }

    /// Invokes every handler of `key` and awaits them according to `mode`.
    ///
    /// - [`EmitMode::Concurrent`]: all handlers are started before any is awaited
    ///   and all run to completion. Failures are returned as
    ///   [`EmitError::Aggregate`], ordered as the handlers are registered.
    /// - [`EmitMode::Sequential`]: handlers run one after another; the first
    ///   failure stops the emission and is returned as [`EmitError::Handler`].
    ///
    /// There is no cancellation: once started, the emission runs to completion.
    pub async fn emit_async_with_mode<Q>(
        &self,
        key: &Q,
        carrier: C,
        payload: P,
        mode: EmitMode,
    ) -> Result<(), EmitError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + Sync + ?Sized,
    {
        let handlers = self.snapshot(key);
        if handlers.is_empty() {
            return Ok(());
        }
        tracing::trace!(key = ?key, handlers = handlers.len(), %mode, "emit_async");

        match mode {
            EmitMode::Sequential => {
                for handler in &handlers {
                    invoke_guarded(handler, carrier.clone(), payload.clone())
                        .await
                        .map_err(EmitError::Handler)?;
                }
                Ok(())
            }
            EmitMode::Concurrent => {
                let started: Vec<BoxHandlerFuture> = handlers
                    .iter()
                    .map(|h| invoke_guarded(h, carrier.clone(), payload.clone()))
                    .collect();

                let errors: Vec<HandlerError> = join_all(started)
                    .await
                    .into_iter()
                    .filter_map(Result::err)
                    .collect();

                if errors.is_empty() {
                    Ok(())
                } else {
                    Err(AggregateFailure::new(format!("{key:?}"), errors).into())
                }
            }
        }
    }

    /// Number of handlers registered for `key`.
    pub fn handler_count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.read().len(key)
    }

    /// True if `handler` is registered for `key`.
    pub fn contains<Q>(&self, key: &Q, handler: &HandlerRef<C, P>) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.read().contains(key, handler)
    }

    /// Keys that currently have handlers, in no particular order.
    pub fn keys(&self) -> Vec<K> {
        self.read().keys().cloned().collect()
    }

    /// True if no key has handlers.
    pub fn is_empty(&self) -> bool {
        self.read().key_count() == 0
    }

    fn snapshot<Q>(&self, key: &Q) -> Vec<HandlerRef<C, P>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.read().snapshot(key)
    }

    // A panicking handler never holds the lock, so poisoning carries no
    // half-applied mutation; recover the guard.
    fn read(&self) -> RwLockReadGuard<'_, Registry<K, C, P>> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry<K, C, P>> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, C, P> Default for Dispatcher<K, C, P>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
    C: Clone + Send + 'static,
    P: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, C, P> fmt::Debug for Dispatcher<K, C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys = self
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .key_count();
        f.debug_struct("Dispatcher")
            .field("cfg", &self.cfg)
            .field("keys", &keys)
            .finish()
    }
}

/// Calls `handler` and returns a future that never unwinds.
///
/// Panics raised by `call` itself or while polling the returned future are
/// converted into [`HandlerPanicked`].
fn invoke_guarded<C: 'static, P: 'static>(
    handler: &HandlerRef<C, P>,
    carrier: C,
    payload: P,
) -> BoxHandlerFuture {
    let name = handler.name().to_owned();
    let invocation =
        match std::panic::catch_unwind(AssertUnwindSafe(|| handler.call(carrier, payload))) {
            Ok(invocation) => invocation,
            Err(panic) => return Box::pin(futures::future::ready(Err(panicked(name, panic)))),
        };

    if invocation.is_ready() {
        return invocation.into_future();
    }
    let fut = invocation.into_future();
    Box::pin(async move {
        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(res) => res,
            Err(panic) => Err(panicked(name, panic)),
        }
    })
}

/// Runs a pending invocation detached from the emitter.
///
/// Inside a Tokio runtime the future is spawned on it; otherwise it is driven
/// to completion on its own thread. The outcome is discarded either way.
fn detach(name: &str, fut: BoxHandlerFuture) {
    match tokio::runtime::Handle::try_current() {
        Ok(rt) => {
            rt.spawn(async move {
                let _ = fut.await;
            });
        }
        Err(_) => {
            tracing::trace!(handler = %name, "no tokio runtime; driving async handler on a thread");
            std::thread::spawn(move || {
                let _ = futures::executor::block_on(fut);
            });
        }
    }
}

fn panicked(handler: String, panic: Box<dyn Any + Send>) -> HandlerError {
    let message = if let Some(s) = panic.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    };
    Box::new(HandlerPanicked { handler, message })
}
