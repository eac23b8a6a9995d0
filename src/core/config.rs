//! # Dispatcher configuration.
//!
//! Provides [`DispatcherConfig`], the options captured once at construction.
//!
//! Config is used in two ways:
//! 1. **Direct creation**: `Dispatcher::with_config(config)`
//! 2. **Builder**: `Dispatcher::builder(config).with_handlers(..).build()`
//!
//! ## Validation
//! - `max_handlers_per_key = 0` → rejected with `DispatchError::Configuration`

use crate::error::DispatchError;

/// Default cap on handlers per key.
pub const DEFAULT_MAX_HANDLERS_PER_KEY: usize = 10;

/// Immutable options of a [`Dispatcher`](crate::Dispatcher).
///
/// ## Field semantics
/// - `max_handlers_per_key`: upper bound on a key's handler list (must be `> 0`)
///
/// ## Notes
/// Fields are public for flexibility; the dispatcher copies the config at
/// construction, so later edits to the caller's value have no effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Maximum number of distinct handlers for a single key.
    ///
    /// Reaching it usually means handlers are leaking (a fresh closure
    /// subscribed per request); raise it only for keys with genuinely many
    /// listeners.
    pub max_handlers_per_key: usize,
}

impl DispatcherConfig {
    /// Returns a config with the given per-key cap.
    #[inline]
    pub fn with_max_handlers_per_key(mut self, max: usize) -> Self {
        self.max_handlers_per_key = max;
        self
    }

    /// Checks the options, returning a `Configuration` error when invalid.
    pub fn validate<K>(&self) -> Result<(), DispatchError<K>> {
        if self.max_handlers_per_key == 0 {
            return Err(DispatchError::Configuration {
                reason: "max_handlers_per_key must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for DispatcherConfig {
    /// Default configuration:
    ///
    /// - `max_handlers_per_key = 10`
    fn default() -> Self {
        Self {
            max_handlers_per_key: DEFAULT_MAX_HANDLERS_PER_KEY,
        }
    }
}
