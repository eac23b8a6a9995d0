//! Built-in handlers shipped with the crate.

#[cfg(feature = "logging")]
mod log;

#[cfg(feature = "logging")]
pub use log::LogHandler;
