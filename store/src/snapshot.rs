//! Read-only backend serving members and election state from a JSON snapshot.
//!
//! The file holds an optional `election` object and a `members` array:
//!
//! ```json
//! {
//!   "election": { "lead_representative": "alice", "board": ["alice"] },
//!   "members": [
//!     { "account": "bob", "representative": "alice", "election_rank": 2 }
//!   ]
//! }
//! ```

use async_trait::async_trait;
use eden_types::{AccountName, ElectionState, Member};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::{ElectionSource, MemberDirectory, StoreError};

/// On-disk snapshot layout.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub election: Option<ElectionState>,
    #[serde(default)]
    pub members: Vec<Member>,
}

/// Immutable in-memory index over a [`Snapshot`].
#[derive(Debug, Default)]
pub struct SnapshotStore {
    election: Option<ElectionState>,
    members: HashMap<AccountName, Member>,
}

impl SnapshotStore {
    /// Index a snapshot. Fails if two records share an account.
    pub fn new(snapshot: Snapshot) -> Result<Self, StoreError> {
        let mut members = HashMap::with_capacity(snapshot.members.len());
        for member in snapshot.members {
            let account = member.account.clone();
            if members.insert(account.clone(), member).is_some() {
                return Err(StoreError::DuplicateMember(account.to_string()));
            }
        }
        Ok(Self {
            election: snapshot.election,
            members,
        })
    }

    /// Parse a snapshot from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, StoreError> {
        let snapshot: Snapshot = serde_json::from_str(s)?;
        Self::new(snapshot)
    }

    /// Load a snapshot from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let store = Self::from_json_str(&content)?;
        tracing::info!(
            path = %path.display(),
            members = store.member_count(),
            has_election = store.election.is_some(),
            "loaded member snapshot"
        );
        Ok(store)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn get(&self, account: &AccountName) -> Option<&Member> {
        self.members.get(account)
    }

    pub fn election(&self) -> Option<&ElectionState> {
        self.election.as_ref()
    }
}

#[async_trait]
impl MemberDirectory for SnapshotStore {
    async fn fetch_by_account(&self, account: &AccountName) -> Result<Option<Member>, StoreError> {
        Ok(self.members.get(account).cloned())
    }
}

#[async_trait]
impl ElectionSource for SnapshotStore {
    async fn fetch_election_state(&self) -> Result<Option<ElectionState>, StoreError> {
        Ok(self.election.clone())
    }
}
