//! Read-through caching in front of any member/election backend.

use async_trait::async_trait;
use eden_store::{ElectionSource, MemberDirectory, StoreError};
use eden_types::{AccountName, ElectionState, Member};

use crate::config::CacheConfig;
use crate::query_cache::{CacheStats, QueryCache};

/// Wraps a backend so repeated and concurrent lookups are served from
/// memory. "Not found" answers are cached like any other; backend errors
/// are not.
pub struct CachedStore<S> {
    inner: S,
    members: QueryCache<AccountName, Option<Member>>,
    election: QueryCache<(), Option<ElectionState>>,
}

impl<S> CachedStore<S> {
    pub fn new(inner: S, config: &CacheConfig) -> Self {
        Self {
            inner,
            members: QueryCache::from_config(config),
            election: QueryCache::from_config(config),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Combined hit/miss counters of both query kinds.
    pub fn stats(&self) -> CacheStats {
        let members = self.members.stats();
        let election = self.election.stats();
        CacheStats {
            hits: members.hits + election.hits,
            misses: members.misses + election.misses,
        }
    }

    /// Forget the cached record for one account.
    pub async fn invalidate_member(&self, account: &AccountName) {
        self.members.invalidate(account).await;
    }

    /// Forget everything, e.g. after a new election concludes.
    pub async fn clear(&self) {
        self.members.clear().await;
        self.election.clear().await;
    }
}

#[async_trait]
impl<S: MemberDirectory> MemberDirectory for CachedStore<S> {
    async fn fetch_by_account(&self, account: &AccountName) -> Result<Option<Member>, StoreError> {
        self.members
            .fetch(account.clone(), || self.inner.fetch_by_account(account))
            .await
    }
}

#[async_trait]
impl<S: ElectionSource> ElectionSource for CachedStore<S> {
    async fn fetch_election_state(&self) -> Result<Option<ElectionState>, StoreError> {
        self.election
            .fetch((), || self.inner.fetch_election_state())
            .await
    }
}
