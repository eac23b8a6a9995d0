//! # Function-backed handlers
//!
//! [`HandlerFn`] wraps an async closure `F: Fn(C, P) -> Fut`, producing a fresh
//! future per invocation. [`SyncHandlerFn`] wraps a plain closure
//! `F: Fn(C, P) -> Result<(), E>` that settles before `call` returns.
//!
//! ## Identity
//! Every `arc(..)` call creates a new handler. Subscribing the same closure
//! expression twice through two `arc(..)` calls registers two handlers; keep
//! the returned [`HandlerRef`] around to unsubscribe or to rely on dedup.
//!
//! ## Example
//! ```rust
//! use emitvisor::{HandlerFn, HandlerRef, SyncHandlerFn};
//!
//! let greet: HandlerRef<(), String> = HandlerFn::arc("greet", |_ctx: (), name: String| async move {
//!     println!("hello {name}");
//!     Ok::<_, std::io::Error>(())
//! });
//! assert_eq!(greet.name(), "greet");
//!
//! let count: HandlerRef<(), String> = SyncHandlerFn::arc("count", |_ctx: (), name: String| {
//!     let _ = name.len();
//!     Ok::<_, std::io::Error>(())
//! });
//! assert_eq!(count.name(), "count");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use futures::TryFutureExt;

use crate::error::HandlerError;
use crate::handlers::handler::{Handler, Invocation};

/// Asynchronous function-backed handler.
///
/// Wraps a closure that *creates* a new future per invocation.
#[derive(Debug)]
pub struct HandlerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`HandlerFn::arc`] when you immediately need a [`HandlerRef`](crate::HandlerRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<C, P, F, Fut, E> Handler<C, P> for HandlerFn<F>
where
    F: Fn(C, P) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Into<HandlerError> + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, carrier: C, payload: P) -> Invocation {
        let fut = (self.f)(carrier, payload).map_err(|e: E| -> HandlerError { e.into() });
        Invocation::Pending(Box::pin(fut))
    }
}

/// Synchronous function-backed handler.
#[derive(Debug)]
pub struct SyncHandlerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> SyncHandlerFn<F> {
    /// Creates a new synchronous handler.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<C, P, F, E> Handler<C, P> for SyncHandlerFn<F>
where
    F: Fn(C, P) -> Result<(), E> + Send + Sync + 'static,
    E: Into<HandlerError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, carrier: C, payload: P) -> Invocation {
        Invocation::Ready((self.f)(carrier, payload).map_err(Into::into))
    }
}
