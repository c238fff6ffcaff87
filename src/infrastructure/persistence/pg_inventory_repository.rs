//! PostgreSQL implementation of the inventory repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{InventoryItem, InventoryItemPatch, NewInventoryItem};
use crate::domain::repositories::InventoryRepository;
use crate::error::AppError;

/// `quantity` is `NUMERIC(10,2)` in the table and read back as `float8`.
const ITEM_COLUMNS: &str = "id, user_id, name, barcode, category, quantity::float8 AS quantity, \
     unit, expiration_date, purchase_date, location, notes, image_url, nutritional_info, \
     is_finished, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct InventoryRow {
    id: i64,
    user_id: i64,
    name: String,
    barcode: Option<String>,
    category: String,
    quantity: f64,
    unit: String,
    expiration_date: Option<DateTime<Utc>>,
    purchase_date: Option<DateTime<Utc>>,
    location: String,
    notes: Option<String>,
    image_url: Option<String>,
    nutritional_info: Option<Value>,
    is_finished: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<InventoryRow> for InventoryItem {
    fn from(row: InventoryRow) -> Self {
        InventoryItem {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            barcode: row.barcode,
            category: row.category,
            quantity: row.quantity,
            unit: row.unit,
            expiration_date: row.expiration_date,
            purchase_date: row.purchase_date,
            location: row.location,
            notes: row.notes,
            image_url: row.image_url,
            nutritional_info: row.nutritional_info,
            is_finished: row.is_finished,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL repository for pantry items.
pub struct PgInventoryRepository {
    pool: Arc<PgPool>,
}

impl PgInventoryRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryRepository for PgInventoryRepository {
    async fn create(&self, new_item: NewInventoryItem) -> Result<InventoryItem, AppError> {
        let sql = format!(
            "INSERT INTO inventory (user_id, name, barcode, category, quantity, unit, \
             expiration_date, purchase_date, location, notes, image_url, nutritional_info) \
             VALUES ($1, $2, $3, $4, $5::numeric, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {ITEM_COLUMNS}"
        );

        let row = sqlx::query_as::<_, InventoryRow>(&sql)
            .bind(new_item.user_id)
            .bind(new_item.name)
            .bind(new_item.barcode)
            .bind(new_item.category)
            .bind(new_item.quantity)
            .bind(new_item.unit)
            .bind(new_item.expiration_date)
            .bind(new_item.purchase_date)
            .bind(new_item.location)
            .bind(new_item.notes)
            .bind(new_item.image_url)
            .bind(new_item.nutritional_info)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, user_id: i64, id: i64) -> Result<Option<InventoryItem>, AppError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM inventory WHERE id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, InventoryRow>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<InventoryItem>, AppError> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM inventory WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, InventoryRow>(&sql)
            .bind(user_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_ids(&self, user_id: i64, ids: &[i64]) -> Result<Vec<InventoryItem>, AppError> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM inventory WHERE user_id = $1 AND id = ANY($2) ORDER BY id"
        );
        let rows = sqlx::query_as::<_, InventoryRow>(&sql)
            .bind(user_id)
            .bind(ids)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        user_id: i64,
        id: i64,
        patch: InventoryItemPatch,
    ) -> Result<Option<InventoryItem>, AppError> {
        let mut tx = self.pool.begin().await?;

        let select = format!(
            "SELECT {ITEM_COLUMNS} FROM inventory WHERE id = $1 AND user_id = $2 FOR UPDATE"
        );
        let Some(row) = sqlx::query_as::<_, InventoryRow>(&select)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let mut item = InventoryItem::from(row);
        patch.apply_to(&mut item);

        let update = format!(
            "UPDATE inventory SET name = $3, barcode = $4, category = $5, quantity = $6::numeric, \
             unit = $7, expiration_date = $8, purchase_date = $9, location = $10, notes = $11, \
             image_url = $12, nutritional_info = $13, is_finished = $14, updated_at = now() \
             WHERE id = $1 AND user_id = $2 RETURNING {ITEM_COLUMNS}"
        );
        let row = sqlx::query_as::<_, InventoryRow>(&update)
            .bind(id)
            .bind(user_id)
            .bind(item.name)
            .bind(item.barcode)
            .bind(item.category)
            .bind(item.quantity)
            .bind(item.unit)
            .bind(item.expiration_date)
            .bind(item.purchase_date)
            .bind(item.location)
            .bind(item.notes)
            .bind(item.image_url)
            .bind(item.nutritional_info)
            .bind(item.is_finished)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(row.into()))
    }

    async fn delete(&self, user_id: i64, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM inventory WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
