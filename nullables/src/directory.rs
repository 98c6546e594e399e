//! Nullable member directory: thread-safe in-memory records for testing.

use async_trait::async_trait;
use eden_store::{MemberDirectory, StoreError};
use eden_types::{AccountName, Member, Representative};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// An in-memory member directory that records every lookup.
pub struct NullMemberDirectory {
    members: Mutex<HashMap<AccountName, Member>>,
    failing: Mutex<HashSet<AccountName>>,
    lookups: Mutex<Vec<AccountName>>,
    latency: Option<Duration>,
}

impl NullMemberDirectory {
    pub fn new() -> Self {
        Self {
            members: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            lookups: Mutex::new(Vec::new()),
            latency: None,
        }
    }

    /// Delay every lookup by `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Insert or replace a record.
    pub fn insert(&self, member: Member) {
        self.members
            .lock()
            .unwrap()
            .insert(member.account.clone(), member);
    }

    /// Insert a record built from its parts. `representative` uses the raw
    /// wire encoding, so sentinels can be passed as-is.
    pub fn add(&self, account: &str, representative: &str, election_rank: u8) {
        self.insert(Member {
            account: AccountName::new(account),
            name: String::new(),
            representative: Representative::decode(representative),
            election_rank,
        });
    }

    /// Remove a record so later lookups return `None`.
    pub fn remove(&self, account: &str) {
        self.members
            .lock()
            .unwrap()
            .remove(&AccountName::new(account));
    }

    /// Make lookups of `account` fail with a backend error.
    pub fn fail_on(&self, account: &str) {
        self.failing
            .lock()
            .unwrap()
            .insert(AccountName::new(account));
    }

    /// Every account looked up so far, in call order.
    pub fn lookups(&self) -> Vec<AccountName> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }
}

impl Default for NullMemberDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemberDirectory for NullMemberDirectory {
    async fn fetch_by_account(&self, account: &AccountName) -> Result<Option<Member>, StoreError> {
        self.lookups.lock().unwrap().push(account.clone());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.lock().unwrap().contains(account) {
            return Err(StoreError::Backend(format!("lookup of {account} failed")));
        }
        Ok(self.members.lock().unwrap().get(account).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_lookups_in_order() {
        let dir = NullMemberDirectory::new();
        dir.add("alice", "alice", 4);
        let alice = dir.fetch_by_account(&"alice".into()).await.unwrap();
        let nobody = dir.fetch_by_account(&"nobody".into()).await.unwrap();
        assert!(alice.is_some());
        assert!(nobody.is_none());
        assert_eq!(
            dir.lookups(),
            vec![AccountName::new("alice"), AccountName::new("nobody")]
        );
    }

    #[tokio::test]
    async fn injected_failure_is_backend_error() {
        let dir = NullMemberDirectory::new();
        dir.add("bob", "alice", 2);
        dir.fail_on("bob");
        let err = dir.fetch_by_account(&"bob".into()).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
        assert_eq!(dir.lookup_count(), 1);
    }

    #[tokio::test]
    async fn removed_member_is_not_found() {
        let dir = NullMemberDirectory::new();
        dir.add("bob", "alice", 2);
        dir.remove("bob");
        assert!(dir.fetch_by_account(&"bob".into()).await.unwrap().is_none());
    }
}
