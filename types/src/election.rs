//! Outcome of the latest concluded election.

use serde::{Deserialize, Serialize};

use crate::account::AccountName;

/// Snapshot of the current election state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionState {
    /// Root of the delegation hierarchy.
    pub lead_representative: AccountName,
    /// Chief delegates seated by the election.
    #[serde(default)]
    pub board: Vec<AccountName>,
}

impl ElectionState {
    /// The head delegate, or `None` if the lead slot holds a sentinel
    /// (no election has concluded yet).
    pub fn head_delegate(&self) -> Option<&AccountName> {
        Some(&self.lead_representative).filter(|lead| !lead.is_sentinel())
    }
}
