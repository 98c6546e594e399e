//! Account name type used for members and representatives.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EdenError;

/// Written in place of a representative when the member has not taken part
/// in any election yet. Thirteen characters long, so it can never collide
/// with a real account.
pub const NOT_PARTICIPATED_SENTINEL: &str = "zzzzzzzzzzzzj";

/// Written in place of a representative when the member's group failed to
/// reach consensus in the last election.
pub const FAILED_CONSENSUS_SENTINEL: &str = "";

/// Longest regular account name.
pub const MAX_ACCOUNT_NAME_LEN: usize = 12;

/// An on-chain account name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountName(String);

impl AccountName {
    /// Wrap a raw string without validation.
    ///
    /// Records read from a directory are trusted as fetched; use
    /// [`AccountName::parse`] for user-supplied input.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse and validate an account name.
    ///
    /// Accepts 1 to 12 characters from `a-z`, `1-5` and `.`, not ending in `.`.
    pub fn parse(raw: &str) -> Result<Self, EdenError> {
        let name = Self(raw.to_string());
        if name.is_valid() {
            Ok(name)
        } else {
            Err(EdenError::InvalidAccountName(raw.to_string()))
        }
    }

    /// Return the raw account string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this name is well-formed.
    pub fn is_valid(&self) -> bool {
        let s = self.0.as_str();
        !s.is_empty()
            && s.len() <= MAX_ACCOUNT_NAME_LEN
            && !s.ends_with('.')
            && s
                .chars()
                .all(|c| matches!(c, 'a'..='z' | '1'..='5' | '.'))
    }

    /// Whether the value is one of the "no representative" markers rather
    /// than a real account.
    pub fn is_sentinel(&self) -> bool {
        self.0 == NOT_PARTICIPATED_SENTINEL || self.0 == FAILED_CONSENSUS_SENTINEL
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AccountName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
