use async_trait::async_trait;
use eden_types::{AccountName, Member};

use crate::StoreError;

/// Looks up member records by account.
///
/// `Ok(None)` means the account has no record; `Err` means the backend could
/// not answer.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn fetch_by_account(&self, account: &AccountName) -> Result<Option<Member>, StoreError>;
}
