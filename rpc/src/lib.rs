//! HTTP API for Eden delegates.
//!
//! Provides endpoints for:
//! - Delegation chains of a member up to the head delegate
//! - Head delegate and chief delegates of the latest election
//! - Member records
//! - Health and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod server;
pub mod shutdown;

pub use config::ServerConfig;
pub use error::RpcError;
pub use metrics::ApiMetrics;
pub use server::{router, AppState, RpcServer};
pub use shutdown::{ShutdownController, ShutdownListener, ShutdownReason};
