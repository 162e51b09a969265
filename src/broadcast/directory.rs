use async_trait::async_trait;

use crate::core::error::AppResult;

/// The set of users a broadcast is delivered to.
///
/// A broadcast reads the id list once and then only deletes; users added
/// after the snapshot are not reached.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Every known user id. Order is irrelevant.
    async fn list_all_user_ids(&self) -> AppResult<Vec<i64>>;

    /// Idempotent: deleting an absent id succeeds.
    async fn delete_user(&self, user_id: i64) -> AppResult<()>;

    async fn count(&self) -> AppResult<u64>;
}
