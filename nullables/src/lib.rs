//! Nullable infrastructure for deterministic testing.
//!
//! The member directory and election source are abstracted behind traits in
//! `eden-store`. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Record every lookup so tests can assert on call order and count
//! - Can inject latency or backend failures on demand
//! - Never touch the filesystem or network
//!
//! Usage: swap real backends for nullables in tests.

pub mod directory;
pub mod election;

pub use directory::NullMemberDirectory;
pub use election::NullElectionSource;
