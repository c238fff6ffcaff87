//! Repository trait for pantry inventory items.

use async_trait::async_trait;

use crate::domain::entities::{InventoryItem, InventoryItemPatch, NewInventoryItem};
use crate::error::AppError;

/// Repository interface for inventory items.
///
/// Every lookup is scoped to the owning user; an item belonging to someone
/// else behaves exactly like a missing one.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgInventoryRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_inventory.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    async fn create(&self, new_item: NewInventoryItem) -> Result<InventoryItem, AppError>;

    async fn find_by_id(&self, user_id: i64, id: i64) -> Result<Option<InventoryItem>, AppError>;

    /// All items of a user, finished ones included, newest first.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<InventoryItem>, AppError>;

    /// Items of a user among `ids`. Unknown or foreign ids are skipped.
    async fn find_by_ids(&self, user_id: i64, ids: &[i64]) -> Result<Vec<InventoryItem>, AppError>;

    /// Applies `patch` to an owned item.
    ///
    /// Returns `Ok(None)` when the item does not exist for this user.
    async fn update(
        &self,
        user_id: i64,
        id: i64,
        patch: InventoryItemPatch,
    ) -> Result<Option<InventoryItem>, AppError>;

    /// Returns `Ok(true)` if the item existed and was deleted.
    async fn delete(&self, user_id: i64, id: i64) -> Result<bool, AppError>;
}
