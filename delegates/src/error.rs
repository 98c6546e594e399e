use eden_types::AccountName;
use thiserror::Error;

/// A delegation chain that cannot be walked to an end.
///
/// Missing records are not errors: the walk returns what it has collected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DelegationError {
    #[error("delegation chain from {start} loops back to {repeated}")]
    Cycle {
        start: AccountName,
        repeated: AccountName,
    },

    #[error("delegation chain from {start} exceeds {max_hops} hops")]
    TooDeep { start: AccountName, max_hops: usize },
}
