//! Fundamental types for Eden delegates.
//!
//! This crate defines the records shared across every other crate in the
//! workspace: account names, members with their decoded representative link,
//! and the election state that roots the delegation hierarchy.

pub mod account;
pub mod election;
pub mod error;
pub mod member;

pub use account::{
    AccountName, FAILED_CONSENSUS_SENTINEL, MAX_ACCOUNT_NAME_LEN, NOT_PARTICIPATED_SENTINEL,
};
pub use election::ElectionState;
pub use error::EdenError;
pub use member::{Member, NoRepresentative, Representative};
