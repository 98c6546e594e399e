//! Tunables for chain resolution and the query cache.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits applied while walking a delegation chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Maximum representative lookups in one walk before the chain is
    /// reported as too deep.
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,
}

/// Behaviour of the read-through query cache.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a loaded value is served before it is fetched again.
    #[serde(default = "default_stale_time_secs")]
    pub stale_time_secs: u64,

    /// Upper bound on cached entries per query kind.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_max_hops() -> usize {
    32
}

fn default_stale_time_secs() -> u64 {
    60
}

fn default_max_entries() -> usize {
    10_000
}

impl CacheConfig {
    pub fn stale_time(&self) -> Duration {
        Duration::from_secs(self.stale_time_secs)
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            max_hops: default_max_hops(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time_secs: default_stale_time_secs(),
            max_entries: default_max_entries(),
        }
    }
}
