//! Delegation chain resolution.
//!
//! Starting from a member, follow representative links upward until the
//! head delegate of the latest election is reached, collecting every member
//! that holds a delegate seat on the way.
//!
//! The walk is best-effort: a missing record or a failed lookup ends it
//! early and the members collected so far are returned. Only a chain that
//! can never end (a loop, or a path longer than `max_hops`) is an error.

use eden_store::{ElectionSource, MemberDirectory};
use eden_types::{AccountName, Member};
use futures_util::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn, Instrument};

use crate::config::ChainConfig;
use crate::error::DelegationError;

/// Resolves delegation chains and leadership queries.
#[derive(Clone)]
pub struct DelegationChainResolver {
    directory: Arc<dyn MemberDirectory>,
    election: Arc<dyn ElectionSource>,
    config: ChainConfig,
}

impl DelegationChainResolver {
    pub fn new(
        directory: Arc<dyn MemberDirectory>,
        election: Arc<dyn ElectionSource>,
        config: ChainConfig,
    ) -> Self {
        Self {
            directory,
            election,
            config,
        }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Walk the delegation chain above `account`.
    ///
    /// Returns the members with `election_rank > 1` in visiting order, then
    /// the head delegate itself whatever its rank, provided the walk reaches
    /// it and it has a representative on record. Returns an empty list when
    /// `account` is absent or empty, when no election has concluded, or when
    /// the starting member is unknown.
    pub async fn resolve_chain(
        &self,
        account: Option<&str>,
    ) -> Result<Vec<Member>, DelegationError> {
        let account = match account {
            Some(a) if !a.is_empty() => AccountName::new(a),
            _ => return Ok(Vec::new()),
        };
        let span = tracing::debug_span!("resolve_chain", %account);
        self.walk(account).instrument(span).await
    }

    async fn walk(&self, start: AccountName) -> Result<Vec<Member>, DelegationError> {
        let mut delegates = Vec::new();

        let Some(lead) = self.head_delegate().await else {
            debug!("no concluded election");
            return Ok(delegates);
        };
        let Some(mut current) = self.lookup(&start).await else {
            debug!("starting member not found");
            return Ok(delegates);
        };

        let mut visited = HashSet::from([current.account.clone()]);
        let mut hops = 0usize;

        while current.account != lead {
            let Some(next) = current.next_hop().cloned() else {
                break;
            };
            if current.is_delegate() {
                delegates.push(current.clone());
            }

            hops += 1;
            if hops > self.config.max_hops {
                warn!(max_hops = self.config.max_hops, "delegation chain too deep");
                return Err(DelegationError::TooDeep {
                    start,
                    max_hops: self.config.max_hops,
                });
            }
            if !visited.insert(next.clone()) {
                warn!(repeated = %next, "delegation chain loops");
                return Err(DelegationError::Cycle {
                    start,
                    repeated: next,
                });
            }

            debug!(from = %current.account, to = %next, "following representative");
            match self.lookup(&next).await {
                Some(member) => current = member,
                None => return Ok(delegates),
            }
        }

        // The head delegate is kept regardless of rank.
        if current.account == lead && current.representative.is_delegate() {
            delegates.push(current);
        }
        Ok(delegates)
    }

    /// Fetch a member, treating lookup failures as "not found".
    async fn lookup(&self, account: &AccountName) -> Option<Member> {
        match self.directory.fetch_by_account(account).await {
            Ok(member) => member,
            Err(e) => {
                warn!(%account, error = %e, "member lookup failed");
                None
            }
        }
    }

    /// The lead representative of the latest concluded election.
    pub async fn head_delegate(&self) -> Option<AccountName> {
        match self.election.fetch_lead_representative().await {
            Ok(lead) => lead,
            Err(e) => {
                warn!(error = %e, "election state lookup failed");
                None
            }
        }
    }

    /// Chief delegates seated by the latest election.
    pub async fn chief_delegates(&self) -> Option<Vec<AccountName>> {
        match self.election.fetch_election_state().await {
            Ok(state) => state.map(|s| s.board),
            Err(e) => {
                warn!(error = %e, "election state lookup failed");
                None
            }
        }
    }

    /// Member records of the chief delegates, in board order. Board entries
    /// without a record are skipped.
    pub async fn chief_delegate_members(&self) -> Vec<Member> {
        let board = self.chief_delegates().await.unwrap_or_default();
        join_all(board.iter().map(|account| self.lookup(account)))
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    /// A single member record.
    pub async fn member(&self, account: &AccountName) -> Option<Member> {
        self.lookup(account).await
    }
}
