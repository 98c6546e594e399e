//! Member records and the decoded representative link.

use serde::{Deserialize, Serialize};

use crate::account::{AccountName, FAILED_CONSENSUS_SENTINEL, NOT_PARTICIPATED_SENTINEL};

/// Why a member has no representative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoRepresentative {
    /// The member has not taken part in any election yet.
    NotParticipated,
    /// The member took part, but their group did not reach consensus.
    FailedConsensus,
}

/// The member one level up in the delegation hierarchy.
///
/// On the wire this is a plain string where two reserved values stand for
/// "no representative". They are decoded here, once, so nothing downstream
/// ever compares against them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Representative {
    Delegate(AccountName),
    None(NoRepresentative),
}

impl Representative {
    /// Decode a raw representative field.
    pub fn decode(raw: &str) -> Self {
        match raw {
            NOT_PARTICIPATED_SENTINEL => Self::None(NoRepresentative::NotParticipated),
            FAILED_CONSENSUS_SENTINEL => Self::None(NoRepresentative::FailedConsensus),
            other => Self::Delegate(AccountName::new(other)),
        }
    }

    /// Encode back to the raw wire value.
    pub fn encode(&self) -> &str {
        match self {
            Self::Delegate(account) => account.as_str(),
            Self::None(NoRepresentative::NotParticipated) => NOT_PARTICIPATED_SENTINEL,
            Self::None(NoRepresentative::FailedConsensus) => FAILED_CONSENSUS_SENTINEL,
        }
    }

    /// The representative's account, if there is one.
    pub fn delegate(&self) -> Option<&AccountName> {
        match self {
            Self::Delegate(account) => Some(account),
            Self::None(_) => None,
        }
    }

    pub fn is_delegate(&self) -> bool {
        matches!(self, Self::Delegate(_))
    }
}

impl From<String> for Representative {
    fn from(raw: String) -> Self {
        Self::decode(&raw)
    }
}

impl From<Representative> for String {
    fn from(rep: Representative) -> Self {
        match rep {
            Representative::Delegate(account) => account.into_string(),
            other => other.encode().to_string(),
        }
    }
}

/// A member of the organisation as recorded after the latest election.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub account: AccountName,
    #[serde(default)]
    pub name: String,
    pub representative: Representative,
    /// Round reached in the most recent election. Ranks of 1 or lower are
    /// not counted as delegates.
    pub election_rank: u8,
}

impl Member {
    /// Whether this member held a delegate seat after the last election.
    pub fn is_delegate(&self) -> bool {
        self.election_rank > 1
    }

    /// The next account up the chain, or `None` when the chain ends here.
    ///
    /// A member naming itself as representative ends the chain too.
    pub fn next_hop(&self) -> Option<&AccountName> {
        self.representative
            .delegate()
            .filter(|rep| **rep != self.account)
    }
}
