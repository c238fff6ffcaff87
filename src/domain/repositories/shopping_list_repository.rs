//! Repository trait for shopping lists and their items.

use async_trait::async_trait;

use crate::domain::entities::{
    NewShoppingList, NewShoppingListItem, ShoppingList, ShoppingListItem, ShoppingListItemPatch,
    ShoppingListPatch,
};
use crate::error::AppError;

/// Repository interface for shopping lists.
///
/// Lists are scoped to their owner. Item operations that take a `user_id`
/// only see items whose list belongs to that user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShoppingListRepository: Send + Sync {
    async fn create_list(
        &self,
        user_id: i64,
        new_list: NewShoppingList,
    ) -> Result<ShoppingList, AppError>;

    async fn find_list(&self, user_id: i64, id: i64) -> Result<Option<ShoppingList>, AppError>;

    /// The most recently created active list of the user.
    async fn find_current(&self, user_id: i64) -> Result<Option<ShoppingList>, AppError>;

    /// All lists of a user, newest first.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<ShoppingList>, AppError>;

    async fn update_list(
        &self,
        user_id: i64,
        id: i64,
        patch: ShoppingListPatch,
    ) -> Result<Option<ShoppingList>, AppError>;

    /// Items are removed by the cascade.
    async fn delete_list(&self, user_id: i64, id: i64) -> Result<bool, AppError>;

    /// Items of a list ordered by position.
    async fn list_items(&self, list_id: i64) -> Result<Vec<ShoppingListItem>, AppError>;

    /// Appends items after the current last position, in one transaction.
    async fn add_items(
        &self,
        list_id: i64,
        items: Vec<NewShoppingListItem>,
    ) -> Result<Vec<ShoppingListItem>, AppError>;

    async fn update_item(
        &self,
        user_id: i64,
        item_id: i64,
        patch: ShoppingListItemPatch,
    ) -> Result<Option<ShoppingListItem>, AppError>;

    async fn delete_item(&self, user_id: i64, item_id: i64) -> Result<bool, AppError>;

    /// Removes items of a list, only purchased ones when `purchased_only`. Returns the count.
    async fn clear_items(&self, list_id: i64, purchased_only: bool) -> Result<u64, AppError>;
}
