//! PostgreSQL implementation of the shopping list repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{
    NewShoppingList, NewShoppingListItem, Priority, ShoppingList, ShoppingListItem,
    ShoppingListItemPatch, ShoppingListPatch,
};
use crate::domain::repositories::ShoppingListRepository;
use crate::error::AppError;

const LIST_COLUMNS: &str = "id, user_id, name, notes, is_active, planned_date, store, \
     budget::float8 AS budget, is_complete, completed_at, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, shopping_list_id, name, quantity::float8 AS quantity, unit, \
     category, notes, priority, is_purchased, price::float8 AS price, inventory_id, recipe_id, \
     position, created_at, updated_at";

/// Restricts item statements with a `$2` user id to items of that user's lists.
const OWNED_BY_USER: &str = "shopping_list_id IN (SELECT id FROM shopping_lists WHERE user_id = $2)";

#[derive(sqlx::FromRow)]
struct ListRow {
    id: i64,
    user_id: i64,
    name: String,
    notes: Option<String>,
    is_active: bool,
    planned_date: Option<DateTime<Utc>>,
    store: Option<String>,
    budget: Option<f64>,
    is_complete: bool,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ListRow> for ShoppingList {
    fn from(row: ListRow) -> Self {
        ShoppingList {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            notes: row.notes,
            is_active: row.is_active,
            planned_date: row.planned_date,
            store: row.store,
            budget: row.budget,
            is_complete: row.is_complete,
            completed_at: row.completed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i64,
    shopping_list_id: i64,
    name: String,
    quantity: f64,
    unit: String,
    category: Option<String>,
    notes: Option<String>,
    priority: String,
    is_purchased: bool,
    price: Option<f64>,
    inventory_id: Option<i64>,
    recipe_id: Option<i64>,
    position: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ItemRow> for ShoppingListItem {
    type Error = AppError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let priority: Priority = row.priority.parse().map_err(|e: String| {
            tracing::error!(item_id = row.id, "Corrupt priority column: {}", e);
            AppError::internal("Error de base de datos", json!({}))
        })?;

        Ok(ShoppingListItem {
            id: row.id,
            shopping_list_id: row.shopping_list_id,
            name: row.name,
            quantity: row.quantity,
            unit: row.unit,
            category: row.category,
            notes: row.notes,
            priority,
            is_purchased: row.is_purchased,
            price: row.price,
            inventory_id: row.inventory_id,
            recipe_id: row.recipe_id,
            position: row.position,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL repository for shopping lists and their items.
pub struct PgShoppingListRepository {
    pool: Arc<PgPool>,
}

impl PgShoppingListRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShoppingListRepository for PgShoppingListRepository {
    async fn create_list(
        &self,
        user_id: i64,
        new_list: NewShoppingList,
    ) -> Result<ShoppingList, AppError> {
        let sql = format!(
            "INSERT INTO shopping_lists (user_id, name, notes, planned_date, store, budget) \
             VALUES ($1, $2, $3, $4, $5, $6::numeric) RETURNING {LIST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ListRow>(&sql)
            .bind(user_id)
            .bind(new_list.name)
            .bind(new_list.notes)
            .bind(new_list.planned_date)
            .bind(new_list.store)
            .bind(new_list.budget)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn find_list(&self, user_id: i64, id: i64) -> Result<Option<ShoppingList>, AppError> {
        let sql = format!("SELECT {LIST_COLUMNS} FROM shopping_lists WHERE id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, ListRow>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_current(&self, user_id: i64) -> Result<Option<ShoppingList>, AppError> {
        let sql = format!(
            "SELECT {LIST_COLUMNS} FROM shopping_lists WHERE user_id = $1 AND is_active \
             ORDER BY created_at DESC, id DESC LIMIT 1"
        );
        let row = sqlx::query_as::<_, ListRow>(&sql)
            .bind(user_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<ShoppingList>, AppError> {
        let sql = format!(
            "SELECT {LIST_COLUMNS} FROM shopping_lists WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, ListRow>(&sql)
            .bind(user_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_list(
        &self,
        user_id: i64,
        id: i64,
        patch: ShoppingListPatch,
    ) -> Result<Option<ShoppingList>, AppError> {
        let mut tx = self.pool.begin().await?;

        let select = format!(
            "SELECT {LIST_COLUMNS} FROM shopping_lists WHERE id = $1 AND user_id = $2 FOR UPDATE"
        );
        let Some(row) = sqlx::query_as::<_, ListRow>(&select)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let mut list = ShoppingList::from(row);
        patch.apply_to(&mut list, Utc::now());

        let update = format!(
            "UPDATE shopping_lists SET name = $3, notes = $4, is_active = $5, planned_date = $6, \
             store = $7, budget = $8::numeric, is_complete = $9, completed_at = $10, \
             updated_at = now() WHERE id = $1 AND user_id = $2 RETURNING {LIST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ListRow>(&update)
            .bind(id)
            .bind(user_id)
            .bind(list.name)
            .bind(list.notes)
            .bind(list.is_active)
            .bind(list.planned_date)
            .bind(list.store)
            .bind(list.budget)
            .bind(list.is_complete)
            .bind(list.completed_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(row.into()))
    }

    async fn delete_list(&self, user_id: i64, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM shopping_lists WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_items(&self, list_id: i64) -> Result<Vec<ShoppingListItem>, AppError> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM shopping_list_items WHERE shopping_list_id = $1 \
             ORDER BY position, id"
        );
        sqlx::query_as::<_, ItemRow>(&sql)
            .bind(list_id)
            .fetch_all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(ShoppingListItem::try_from)
            .collect()
    }

    async fn add_items(
        &self,
        list_id: i64,
        items: Vec<NewShoppingListItem>,
    ) -> Result<Vec<ShoppingListItem>, AppError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;

        // Serializes concurrent appends to the same list so positions stay unique.
        sqlx::query("SELECT id FROM shopping_lists WHERE id = $1 FOR UPDATE")
            .bind(list_id)
            .execute(&mut *tx)
            .await?;

        let next_position: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM shopping_list_items WHERE shopping_list_id = $1",
        )
        .bind(list_id)
        .fetch_one(&mut *tx)
        .await?;

        let sql = format!(
            "INSERT INTO shopping_list_items (shopping_list_id, name, quantity, unit, category, \
             notes, priority, price, inventory_id, recipe_id, position) \
             VALUES ($1, $2, $3::numeric, $4, $5, $6, $7, $8::numeric, $9, $10, $11) \
             RETURNING {ITEM_COLUMNS}"
        );

        let mut inserted = Vec::with_capacity(items.len());
        for (offset, item) in items.into_iter().enumerate() {
            let row = sqlx::query_as::<_, ItemRow>(&sql)
                .bind(list_id)
                .bind(item.name)
                .bind(item.quantity)
                .bind(item.unit)
                .bind(item.category)
                .bind(item.notes)
                .bind(item.priority.as_str())
                .bind(item.price)
                .bind(item.inventory_id)
                .bind(item.recipe_id)
                .bind(next_position + offset as i32)
                .fetch_one(&mut *tx)
                .await?;
            inserted.push(ShoppingListItem::try_from(row)?);
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn update_item(
        &self,
        user_id: i64,
        item_id: i64,
        patch: ShoppingListItemPatch,
    ) -> Result<Option<ShoppingListItem>, AppError> {
        let mut tx = self.pool.begin().await?;

        let select = format!(
            "SELECT {ITEM_COLUMNS} FROM shopping_list_items WHERE id = $1 AND {OWNED_BY_USER} FOR UPDATE"
        );
        let Some(row) = sqlx::query_as::<_, ItemRow>(&select)
            .bind(item_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let mut item = ShoppingListItem::try_from(row)?;
        patch.apply_to(&mut item);

        let update = format!(
            "UPDATE shopping_list_items SET name = $3, quantity = $4::numeric, unit = $5, \
             category = $6, notes = $7, priority = $8, is_purchased = $9, price = $10::numeric, \
             updated_at = now() WHERE id = $1 AND {OWNED_BY_USER} RETURNING {ITEM_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ItemRow>(&update)
            .bind(item_id)
            .bind(user_id)
            .bind(item.name)
            .bind(item.quantity)
            .bind(item.unit)
            .bind(item.category)
            .bind(item.notes)
            .bind(item.priority.as_str())
            .bind(item.is_purchased)
            .bind(item.price)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        ShoppingListItem::try_from(row).map(Some)
    }

    async fn delete_item(&self, user_id: i64, item_id: i64) -> Result<bool, AppError> {
        let sql = format!("DELETE FROM shopping_list_items WHERE id = $1 AND {OWNED_BY_USER}");
        let result = sqlx::query(&sql)
            .bind(item_id)
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear_items(&self, list_id: i64, purchased_only: bool) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM shopping_list_items WHERE shopping_list_id = $1 AND (NOT $2 OR is_purchased)",
        )
        .bind(list_id)
        .bind(purchased_only)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }
}
