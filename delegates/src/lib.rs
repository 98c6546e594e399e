//! Delegation chains for Eden members.
//!
//! Walks a member's representative links up to the head delegate of the
//! latest election, reading members through a read-through query cache
//! that deduplicates concurrent identical lookups.
//!
//! Lookups are best-effort: missing records shorten the result instead of
//! failing it. Only chains that can never terminate are reported as errors.

pub mod cached;
pub mod chain;
pub mod config;
pub mod error;
pub mod query_cache;

pub use cached::CachedStore;
pub use chain::DelegationChainResolver;
pub use config::{CacheConfig, ChainConfig};
pub use error::DelegationError;
pub use query_cache::{CacheStats, QueryCache};
