//! # LogHandler — simple emission recorder
//!
//! A minimal handler that records every emission it receives through `tracing`.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! INFO emitvisor: emitted handler="log" payload="UserCreated { id: 7 }"
//! ```

use std::borrow::Cow;
use std::fmt::Debug;

use crate::handlers::{Handler, Invocation};

/// Handler that logs the payload of every emission at `info` level.
///
/// The carrier is ignored.
#[derive(Debug, Clone)]
pub struct LogHandler {
    name: Cow<'static, str>,
}

impl LogHandler {
    /// Construct a new [`LogHandler`] named `"log"`.
    #[must_use]
    pub fn new() -> Self {
        Self::named("log")
    }

    /// Construct a [`LogHandler`] with a custom name.
    #[must_use]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for LogHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, P> Handler<C, P> for LogHandler
where
    P: Debug,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, _carrier: C, payload: P) -> Invocation {
        tracing::info!(handler = %self.name, payload = ?payload, "emitted");
        Invocation::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::HandlerRef;
    use std::sync::Arc;

    #[test]
    fn test_log_handler_always_succeeds() {
        let h: HandlerRef<(), &'static str> = Arc::new(LogHandler::named("audit"));
        assert_eq!(h.name(), "audit");
        assert!(matches!(h.call((), "hello"), Invocation::Ready(Ok(()))));
    }
}
