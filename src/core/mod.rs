//! Dispatch core: registry, configuration and emission.
//!
//! The public API from this module is [`Dispatcher`] (with its builder), the
//! [`DispatcherConfig`] options and the [`EmitMode`] selector.
//!
//! Internal modules:
//! - [`registry`]: key → ordered handler list, dedup and cap checks;
//! - [`dispatcher`]: locking, subscribe/unsubscribe and both emission protocols;
//! - [`builder`]: construction with seeded handlers and option validation.

mod builder;
mod config;
mod dispatcher;
mod mode;
mod registry;

pub use builder::DispatcherBuilder;
pub use config::{DEFAULT_MAX_HANDLERS_PER_KEY, DispatcherConfig};
pub use dispatcher::Dispatcher;
pub use mode::EmitMode;
