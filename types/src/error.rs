//! Error type shared by the domain types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EdenError {
    #[error("invalid account name: {0:?}")]
    InvalidAccountName(String),
}
