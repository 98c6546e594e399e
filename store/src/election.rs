use async_trait::async_trait;
use eden_types::{AccountName, ElectionState};

use crate::StoreError;

/// Source of the current election state.
#[async_trait]
pub trait ElectionSource: Send + Sync {
    /// The latest concluded election, or `None` if there has not been one.
    async fn fetch_election_state(&self) -> Result<Option<ElectionState>, StoreError>;

    /// The lead representative (head delegate) of the latest election.
    async fn fetch_lead_representative(&self) -> Result<Option<AccountName>, StoreError> {
        Ok(self
            .fetch_election_state()
            .await?
            .and_then(|state| state.head_delegate().cloned()))
    }
}
