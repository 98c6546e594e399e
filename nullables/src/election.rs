//! Nullable election source.

use async_trait::async_trait;
use eden_store::{ElectionSource, StoreError};
use eden_types::{AccountName, ElectionState};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// A controllable election source that counts its lookups.
pub struct NullElectionSource {
    state: Mutex<Option<ElectionState>>,
    failing: AtomicBool,
    fetches: AtomicUsize,
}

impl NullElectionSource {
    /// No election has concluded.
    pub fn empty() -> Self {
        Self {
            state: Mutex::new(None),
            failing: AtomicBool::new(false),
            fetches: AtomicUsize::new(0),
        }
    }

    /// An election led by `lead` with an empty board.
    pub fn with_lead(lead: &str) -> Self {
        let source = Self::empty();
        source.set(Some(ElectionState {
            lead_representative: AccountName::new(lead),
            board: Vec::new(),
        }));
        source
    }

    /// An election led by `lead` with the given chief delegates.
    pub fn with_board(lead: &str, board: &[&str]) -> Self {
        let source = Self::empty();
        source.set(Some(ElectionState {
            lead_representative: AccountName::new(lead),
            board: board.iter().map(|a| AccountName::new(*a)).collect(),
        }));
        source
    }

    pub fn set(&self, state: Option<ElectionState>) {
        *self.state.lock().unwrap() = state;
    }

    /// Make every fetch fail with a backend error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

impl Default for NullElectionSource {
    fn default() -> Self {
        Self::empty()
    }
}

#[async_trait]
impl ElectionSource for NullElectionSource {
    async fn fetch_election_state(&self) -> Result<Option<ElectionState>, StoreError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        if self.failing.load(Ordering::Relaxed) {
            return Err(StoreError::Backend("election state unavailable".to_string()));
        }
        Ok(self.state.lock().unwrap().clone())
    }
}
