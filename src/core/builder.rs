use std::fmt;
use std::hash::Hash;

use crate::core::config::DispatcherConfig;
use crate::core::dispatcher::Dispatcher;
use crate::core::registry::Registry;
use crate::error::DispatchError;
use crate::handlers::HandlerRef;

/// Builder for constructing a [`Dispatcher`] pre-seeded with handlers.
///
/// Seeded lists are taken verbatim: duplicates are kept, only
/// [`Dispatcher::subscribe`] de-duplicates. A seeded list longer than
/// `max_handlers_per_key` makes [`build`](Self::build) fail.
pub struct DispatcherBuilder<K, C, P> {
    cfg: DispatcherConfig,
    seeds: Vec<(K, Vec<HandlerRef<C, P>>)>,
}

impl<K, C, P> DispatcherBuilder<K, C, P>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
    C: Clone + Send + 'static,
    P: Clone + Send + 'static,
{
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: DispatcherConfig) -> Self {
        Self {
            cfg,
            seeds: Vec::new(),
        }
    }

    /// Seeds `key` with `handlers`, appended after anything seeded before.
    pub fn with_handlers(mut self, key: K, handlers: Vec<HandlerRef<C, P>>) -> Self {
        self.seeds.push((key, handlers));
        self
    }

    /// Seeds several keys at once.
    pub fn with_initial<I>(mut self, initial: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<HandlerRef<C, P>>)>,
    {
        self.seeds.extend(initial);
        self
    }

    /// Validates the config and seeds, then builds the dispatcher.
    pub fn build(self) -> Result<Dispatcher<K, C, P>, DispatchError<K>> {
        self.cfg.validate()?;

        let mut registry = Registry::new();
        for (key, handlers) in self.seeds {
            registry.seed(key, handlers);
        }

        let limit = self.cfg.max_handlers_per_key;
        if let Some((key, len)) = registry.longest().filter(|(_, len)| *len > limit) {
            return Err(DispatchError::Configuration {
                reason: format!(
                    "initial handlers for key {key:?} ({len}) exceed max_handlers_per_key ({limit})"
                ),
            });
        }

        tracing::debug!(
            keys = registry.key_count(),
            max_handlers_per_key = limit,
            "dispatcher built"
        );
        Ok(Dispatcher::from_parts(self.cfg, registry))
    }
}
