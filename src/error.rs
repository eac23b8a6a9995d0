//! Error types used by the dispatcher and by emissions.
//!
//! This module defines two main error enums:
//!
//! - [`DispatchError`] — errors raised by the dispatcher itself (construction, subscribe).
//! - [`EmitError`] — failures surfaced by [`Dispatcher::emit_async`](crate::Dispatcher::emit_async).
//!
//! Handler failures are carried as [`HandlerError`] and are never rewritten:
//! `emit_sync` returns the failing handler's error itself, sequential emission
//! wraps it in [`EmitError::Handler`] untouched, and concurrent failures are
//! collected in an [`AggregateFailure`].

use std::fmt;

use thiserror::Error;

/// Error produced by a handler invocation.
///
/// Boxed so any error type can flow through the dispatcher untouched;
/// callers recover the concrete type with `downcast_ref`.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # Errors produced by the dispatcher.
///
/// Raised synchronously; whenever one is returned the registry is unchanged.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError<K> {
    /// Invalid construction options (e.g. a zero handler limit).
    #[error("invalid dispatcher configuration: {reason}")]
    Configuration {
        /// What was wrong with the options.
        reason: String,
    },

    /// Subscribe was given a value that is not a handler for this dispatcher.
    #[error("value subscribed to {key:?} is not a callable handler")]
    InvalidHandler {
        /// The key the subscription targeted.
        key: K,
    },

    /// The per-key handler cap has been reached.
    #[error(
        "handler limit of {limit} reached for key {key:?}; this may indicate a leak \
         (e.g. a fresh closure subscribed on a hot path), or raise \
         `max_handlers_per_key` in the dispatcher config"
    )]
    HandlerLimitExceeded {
        /// The key whose list is full.
        key: K,
        /// The configured limit.
        limit: usize,
    },
}

impl<K: fmt::Debug> DispatchError<K> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use emitvisor::DispatchError;
    ///
    /// let err = DispatchError::HandlerLimitExceeded { key: "user.created", limit: 10 };
    /// assert_eq!(err.as_label(), "dispatch_handler_limit_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::Configuration { .. } => "dispatch_configuration",
            DispatchError::InvalidHandler { .. } => "dispatch_invalid_handler",
            DispatchError::HandlerLimitExceeded { .. } => "dispatch_handler_limit_exceeded",
        }
    }

    /// Returns a compact human-readable message with the error details.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::Configuration { reason } => format!("configuration: {reason}"),
            DispatchError::InvalidHandler { key } => format!("invalid handler: key={key:?}"),
            DispatchError::HandlerLimitExceeded { key, limit } => {
                format!("handler limit exceeded: key={key:?} limit={limit}")
            }
        }
    }
}

/// # Failures surfaced by an emission.
///
/// - [`EmitError::Handler`]: the first failure of a sequential emission,
///   exactly as the handler produced it.
/// - [`EmitError::Aggregate`]: every failure of a concurrent emission.
#[derive(Error, Debug)]
pub enum EmitError {
    /// A single handler failure, unwrapped.
    #[error(transparent)]
    Handler(HandlerError),

    /// One or more handlers failed during a concurrent emission.
    #[error(transparent)]
    Aggregate(#[from] AggregateFailure),
}

impl EmitError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EmitError::Handler(_) => "emit_handler_failed",
            EmitError::Aggregate(_) => "emit_aggregate_failure",
        }
    }

    /// Returns the wrapped handler error when this is a single failure.
    pub fn as_handler(&self) -> Option<&HandlerError> {
        match self {
            EmitError::Handler(err) => Some(err),
            EmitError::Aggregate(_) => None,
        }
    }

    /// Returns the aggregate when this came from a concurrent emission.
    pub fn as_aggregate(&self) -> Option<&AggregateFailure> {
        match self {
            EmitError::Aggregate(agg) => Some(agg),
            EmitError::Handler(_) => None,
        }
    }
}

/// All failures collected from one concurrent emission.
///
/// Errors are ordered by the position of their handler in the key's list,
/// not by completion time.
#[derive(Error, Debug)]
#[error("{} handler(s) failed for key {key}", .errors.len())]
pub struct AggregateFailure {
    key: String,
    errors: Vec<HandlerError>,
}

impl AggregateFailure {
    pub(crate) fn new(key: String, errors: Vec<HandlerError>) -> Self {
        Self { key, errors }
    }

    /// Debug rendering of the emitted key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying failures in handler registration order.
    pub fn errors(&self) -> &[HandlerError] {
        &self.errors
    }

    /// Consumes the aggregate and returns the underlying failures.
    pub fn into_errors(self) -> Vec<HandlerError> {
        self.errors
    }

    /// Number of failed handlers.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always `false` for aggregates built by the dispatcher.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A handler panicked while being driven by an asynchronous emission.
///
/// The panic is caught so the remaining handlers still run; it is then
/// reported like any other handler failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("handler '{handler}' panicked: {message}")]
pub struct HandlerPanicked {
    /// Name of the panicking handler.
    pub handler: String,
    /// Panic payload when it was a string, otherwise a placeholder.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("boom {0}")]
    struct Boom(u32);

    #[test]
    fn test_limit_message_mentions_key_limit_and_hint() {
        let err = DispatchError::HandlerLimitExceeded { key: "orders", limit: 3 };
        let msg = err.to_string();
        assert!(msg.contains("\"orders\""));
        assert!(msg.contains('3'));
        assert!(msg.contains("leak"));
        assert!(msg.contains("max_handlers_per_key"));
    }

    #[test]
    fn test_labels_are_stable() {
        let cfg: DispatchError<&str> = DispatchError::Configuration { reason: "x".into() };
        assert_eq!(cfg.as_label(), "dispatch_configuration");
        assert_eq!(
            DispatchError::InvalidHandler { key: 1u8 }.as_label(),
            "dispatch_invalid_handler"
        );
        assert_eq!(
            EmitError::Handler(Box::new(Boom(1))).as_label(),
            "emit_handler_failed"
        );
    }

    #[test]
    fn test_handler_error_is_transparent() {
        let err = EmitError::Handler(Box::new(Boom(7)));
        assert_eq!(err.to_string(), "boom 7");
        let inner = err.as_handler().unwrap();
        assert_eq!(inner.downcast_ref::<Boom>().unwrap().0, 7);
        assert!(err.as_aggregate().is_none());
    }

    #[derive(Debug, Error)]
    #[error("request failed")]
    struct Wrapped(#[source] Boom);

    #[test]
    fn test_handler_error_keeps_source_chain() {
        use std::error::Error as _;

        let err = EmitError::Handler(Box::new(Wrapped(Boom(3))));
        assert_eq!(err.to_string(), "request failed");
        let source = err.source().expect("source of the handler error");
        assert_eq!(source.to_string(), "boom 3");
    }

    #[test]
    fn test_aggregate_summary() {
        let agg = AggregateFailure::new(
            "\"orders\"".into(),
            vec![Box::new(Boom(1)), Box::new(Boom(2))],
        );
        assert_eq!(agg.to_string(), "2 handler(s) failed for key \"orders\"");
        assert_eq!(agg.len(), 2);
        assert_eq!(agg.key(), "\"orders\"");

        let err = EmitError::from(agg);
        assert_eq!(err.as_label(), "emit_aggregate_failure");
        let errors = err.as_aggregate().unwrap().errors();
        assert_eq!(errors[1].to_string(), "boom 2");
    }

    #[test]
    fn test_handler_panicked_display() {
        let p = HandlerPanicked { handler: "audit".into(), message: "oops".into() };
        assert_eq!(p.to_string(), "handler 'audit' panicked: oops");
    }
}
