//! # emitvisor
//!
//! **Emitvisor** is a small in-process publish/subscribe dispatcher for Rust.
//!
//! Callers register handlers against event keys, then trigger every handler of
//! a key either synchronously (fire and forget) or asynchronously (concurrent
//! with aggregated failures, or sequential stopping at the first failure).
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  HandlerRef  │   │  HandlerRef  │   │  HandlerRef  │
//!     │  (HandlerFn) │   │(SyncHandlerFn│   │ (user impl)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼ subscribe        ▼ subscribe        ▼ subscribe
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Dispatcher                                                       │
//! │  - DispatcherConfig (max_handlers_per_key, default 10)            │
//! │  - RwLock<Registry>: key → [h1, h2, ..] (insertion order, no dups)│
//! └──────┬──────────────────────────┬─────────────────────────┬───────┘
//!        ▼                          ▼                         ▼
//!   emit_sync(key, c, p)    emit_async(key, c, p)   emit_async_with_mode(.., Sequential)
//!   h1(c,p) ─► h2(c,p) ..   h1 ┐                    h1.await ─► h2.await ─► ..
//!   Ready(Err) ─► return    h2 ┼─► join_all         first Err ─► EmitError::Handler
//!   Pending ─► detached     hN ┘   ─► EmitError::Aggregate
//! ```
//!
//! ### Emission
//! ```text
//! snapshot(key) ── lock released ──► invoke handlers with (carrier.clone(), payload.clone())
//!
//! emit_sync:
//!   ├─ Ready(Ok)   ─► next handler
//!   ├─ Ready(Err)  ─► stop, return error unchanged
//!   └─ Pending     ─► tokio::spawn or own thread (outcome discarded), next handler
//!
//! emit_async (Concurrent):
//!   ├─ start all invocations
//!   ├─ await all (no short-circuit)
//!   └─ any Err ─► AggregateFailure { errors in list order }
//!
//! emit_async (Sequential):
//!   └─ for each: await ─► Err? stop, later handlers never run
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                           |
//! |-------------------|---------------------------------------------------------------|----------------------------------------------|
//! | **Dispatch**      | Subscribe/unsubscribe and both emission protocols.            | [`Dispatcher`], [`EmitMode`]                 |
//! | **Handlers**      | Sync or async callables with identity-based dedup.            | [`Handler`], [`HandlerFn`], [`SyncHandlerFn`]|
//! | **Errors**        | Typed errors for configuration, subscribe and emission.       | [`DispatchError`], [`EmitError`]             |
//! | **Configuration** | Per-key handler cap, validated at construction.               | [`DispatcherConfig`], [`DispatcherBuilder`]  |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogHandler`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use emitvisor::{Dispatcher, EmitMode, HandlerFn, HandlerRef};
//!
//! #[derive(Clone)]
//! struct RequestCtx { id: u64 }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bus: Arc<Dispatcher<&'static str, RequestCtx, String>> = Arc::new(Dispatcher::new());
//!
//!     let audit: HandlerRef<RequestCtx, String> =
//!         HandlerFn::arc("audit", |ctx: RequestCtx, user: String| async move {
//!             println!("[{}] user created: {user}", ctx.id);
//!             Ok::<_, std::io::Error>(())
//!         });
//!     bus.subscribe("user.created", audit.clone())?;
//!
//!     let ctx = RequestCtx { id: 1 };
//!     bus.emit_async("user.created", ctx.clone(), "ada".into()).await?;
//!     bus.emit_async_with_mode("user.created", ctx, "bob".into(), EmitMode::Sequential)
//!         .await?;
//!
//!     bus.unsubscribe("user.created", &audit);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod handlers;

// ---- Public re-exports ----

pub use crate::core::{
    DEFAULT_MAX_HANDLERS_PER_KEY, Dispatcher, DispatcherBuilder, DispatcherConfig, EmitMode,
};
pub use error::{AggregateFailure, DispatchError, EmitError, HandlerError, HandlerPanicked};
pub use handlers::{
    BoxHandlerFuture, Handler, HandlerFn, HandlerRef, Invocation, SyncHandlerFn, same_handler,
};

// Optional: expose a simple built-in logging handler (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use handlers::LogHandler;
