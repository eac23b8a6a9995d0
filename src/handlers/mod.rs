//! # Handler abstractions.
//!
//! This module provides the handler-related types:
//! - [`Handler`] - trait for anything invokable with `(carrier, payload)`
//! - [`Invocation`] - result of one call: already settled or still pending
//! - [`HandlerRef`] - shared, identity-bearing handle (`Arc<dyn Handler>`)
//! - [`HandlerFn`] / [`SyncHandlerFn`] - closure-backed handlers
//!
//! ## Identity
//! ```text
//! let h = HandlerFn::arc("a", f);   ──► allocation #1
//! let h2 = h.clone();               ──► allocation #1   (same handler)
//! let h3 = HandlerFn::arc("a", f);  ──► allocation #2   (distinct handler)
//! ```

mod embedded;
mod handler;
mod handler_fn;

#[cfg(feature = "logging")]
pub use embedded::LogHandler;
pub use handler::{BoxHandlerFuture, Handler, HandlerRef, Invocation, same_handler};
pub use handler_fn::{HandlerFn, SyncHandlerFn};
