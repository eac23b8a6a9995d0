//! # Handler trait and invocation results.
//!
//! A [`Handler`] is invoked with an owned carrier and payload and reports back an
//! [`Invocation`]: either it finished on the spot ([`Invocation::Ready`]) or it
//! handed back a future the emitter may await ([`Invocation::Pending`]).
//!
//! Handlers are shared as [`HandlerRef`] (`Arc<dyn Handler<C, P>>`). The `Arc`
//! allocation is the handler's identity: clones of one `HandlerRef` are the same
//! handler, two separately built handlers never are, even with identical closures.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::HandlerError;

/// Boxed future returned by asynchronous handlers.
pub type BoxHandlerFuture = BoxFuture<'static, Result<(), HandlerError>>;

/// Shared handle to a handler.
pub type HandlerRef<C, P> = Arc<dyn Handler<C, P>>;

/// Outcome of calling a handler once.
pub enum Invocation {
    /// The handler ran to completion synchronously.
    Ready(Result<(), HandlerError>),
    /// The handler started asynchronous work that settles later.
    Pending(BoxHandlerFuture),
}

impl Invocation {
    /// Settled success.
    #[inline]
    pub fn ok() -> Self {
        Invocation::Ready(Ok(()))
    }

    /// True if the handler finished synchronously.
    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, Invocation::Ready(_))
    }

    /// Converts the invocation into a future, settled or not.
    pub fn into_future(self) -> BoxHandlerFuture {
        match self {
            Invocation::Ready(res) => Box::pin(futures::future::ready(res)),
            Invocation::Pending(fut) => fut,
        }
    }
}

impl std::fmt::Debug for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Invocation::Ready(res) => f.debug_tuple("Ready").field(res).finish(),
            Invocation::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// # Callable registered against an event key.
///
/// `C` is the opaque carrier (e.g. a per-request context) and `P` the payload;
/// both are handed over by value, one clone per handler.
///
/// # Example
/// ```
/// use emitvisor::{Handler, Invocation};
///
/// struct Audit;
///
/// impl Handler<(), String> for Audit {
///     fn name(&self) -> &str { "audit" }
///
///     fn call(&self, _carrier: (), payload: String) -> Invocation {
///         if payload.is_empty() {
///             return Invocation::Ready(Err("empty payload".into()));
///         }
///         Invocation::ok()
///     }
/// }
/// ```
pub trait Handler<C, P>: Send + Sync + 'static {
    /// Returns a human-readable handler name used in diagnostics.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Invokes the handler with `(carrier, payload)`.
    ///
    /// Must not block; long work belongs in the returned future.
    fn call(&self, carrier: C, payload: P) -> Invocation;
}

/// Identity comparison of two handler handles.
///
/// Compares the allocation only, so it is unaffected by which vtable a
/// particular `Arc<dyn ..>` happens to carry.
#[inline]
pub fn same_handler<C, P>(a: &HandlerRef<C, P>, b: &HandlerRef<C, P>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
