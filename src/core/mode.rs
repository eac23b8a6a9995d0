//! # Asynchronous emission modes.
//!
//! - [`EmitMode::Concurrent`] starts every handler, waits for all of them, then
//!   reports every failure as one aggregate (default).
//! - [`EmitMode::Sequential`] awaits handlers one by one and stops at the first failure.
//!
//! ```text
//! Concurrent:  h1 ════╗
//!              h2 ══════╗         total ≈ max(h1, h2, h3)
//!              h3 ══╗   ║
//!                   ▼   ▼
//!                 join_all ─► Ok | Aggregate[errors in list order]
//!
//! Sequential:  h1 ════ h2 ══════ h3 ══     total ≈ h1 + h2 + h3
//!                      └─ Err? stop, return it unwrapped
//! ```

use std::fmt;

/// How [`Dispatcher::emit_async_with_mode`](crate::Dispatcher::emit_async_with_mode) runs handlers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EmitMode {
    /// Interleave all handlers on the emitting task; never short-circuits.
    #[default]
    Concurrent,
    /// One handler at a time, in insertion order; first failure wins.
    Sequential,
}

impl EmitMode {
    /// Short stable label for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmitMode::Concurrent => "concurrent",
            EmitMode::Sequential => "sequential",
        }
    }
}

impl fmt::Display for EmitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
