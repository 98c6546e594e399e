//! Shared utilities for Eden delegates.

pub mod logging;

pub use logging::{init_logging, LogFormat};
