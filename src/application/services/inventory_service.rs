//! Pantry inventory management.

use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::services::ProductService;
use crate::domain::entities::{InventoryItem, InventoryItemPatch, NewInventoryItem};
use crate::domain::expiration::{self, ExpirationStatus};
use crate::domain::filter::{self, InventoryFilter, Page, SortKey, SortOrder};
use crate::domain::repositories::InventoryRepository;
use crate::error::AppError;
use crate::infrastructure::food_data::FoodDataSource;

/// An item with its expiration label computed at read time.
#[derive(Debug, Clone)]
pub struct ClassifiedItem {
    pub item: InventoryItem,
    pub expiration_status: ExpirationStatus,
    pub days_until_expiration: Option<i64>,
}

impl ClassifiedItem {
    fn new(item: InventoryItem, now: DateTime<Utc>, soon_within_days: i64) -> Self {
        Self {
            expiration_status: item.expiration_status(now, soon_within_days),
            days_until_expiration: item
                .expiration_date
                .map(|date| expiration::days_until(date, now)),
            item,
        }
    }
}

/// Listing parameters after defaults have been applied.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub filter: InventoryFilter,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    pub page: usize,
    pub limit: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filter: InventoryFilter::default(),
            sort_by: SortKey::CreatedAt,
            sort_order: SortOrder::Desc,
            page: 1,
            limit: 20,
        }
    }
}

/// Summary counters over a user's unfinished items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryStats {
    pub total_items: usize,
    pub expired_items: usize,
    pub soon_to_expire_items: usize,
    /// Sorted by category.
    pub items_by_category: Vec<(String, usize)>,
    /// Sorted by location.
    pub items_by_location: Vec<(String, usize)>,
}

fn count_by<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn item_not_found(id: i64) -> AppError {
    AppError::not_found("Producto no encontrado", json!({ "id": id }))
}

pub struct InventoryService<I: InventoryRepository, F: FoodDataSource> {
    items: Arc<I>,
    products: Arc<ProductService<F>>,
    soon_within_days: i64,
}

impl<I: InventoryRepository, F: FoodDataSource> InventoryService<I, F> {
    pub fn new(items: Arc<I>, products: Arc<ProductService<F>>, soon_within_days: i64) -> Self {
        Self {
            items,
            products,
            soon_within_days,
        }
    }

    /// Filters, sorts and paginates the user's items.
    pub async fn list(&self, user_id: i64, query: ListQuery) -> Result<Page<ClassifiedItem>, AppError> {
        let now = Utc::now();
        let items = self.items.list_by_user(user_id).await?;

        let mut kept = query.filter.apply(items, now, self.soon_within_days);
        filter::sort(&mut kept, query.sort_by, query.sort_order);

        let page = filter::paginate(kept, query.page, query.limit);
        Ok(Page {
            items: page
                .items
                .into_iter()
                .map(|item| ClassifiedItem::new(item, now, self.soon_within_days))
                .collect(),
            info: page.info,
        })
    }

    pub async fn stats(&self, user_id: i64) -> Result<InventoryStats, AppError> {
        let now = Utc::now();
        let active: Vec<InventoryItem> = self
            .items
            .list_by_user(user_id)
            .await?
            .into_iter()
            .filter(|item| !item.is_finished)
            .collect();

        let status_count = |status: ExpirationStatus| {
            active
                .iter()
                .filter(|item| item.expiration_status(now, self.soon_within_days) == status)
                .count()
        };

        Ok(InventoryStats {
            total_items: active.len(),
            expired_items: status_count(ExpirationStatus::Expired),
            soon_to_expire_items: status_count(ExpirationStatus::Soon),
            items_by_category: count_by(active.iter().map(|i| i.category.as_str())),
            items_by_location: count_by(active.iter().map(|i| i.location.as_str())),
        })
    }

    pub async fn get(&self, user_id: i64, id: i64) -> Result<ClassifiedItem, AppError> {
        let item = self
            .items
            .find_by_id(user_id, id)
            .await?
            .ok_or_else(|| item_not_found(id))?;
        Ok(self.classify(item))
    }

    /// Creates an item. A barcode without nutritional info triggers a product
    /// lookup; lookup failures are logged and the item is stored without it.
    pub async fn create(&self, mut new_item: NewInventoryItem) -> Result<ClassifiedItem, AppError> {
        if new_item.nutritional_info.is_none()
            && let Some(barcode) = new_item.barcode.as_deref()
        {
            match self.products.lookup(barcode).await {
                Ok(product) if !product.nutritional_info.is_empty() => {
                    new_item.nutritional_info = serde_json::to_value(&product.nutritional_info).ok();
                }
                Ok(_) => {}
                Err(e) => warn!(barcode, error = %e, "Skipping nutritional enrichment"),
            }
        }

        let item = self.items.create(new_item).await?;
        info!(item_id = item.id, user_id = item.user_id, "Inventory item created");
        Ok(self.classify(item))
    }

    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        patch: InventoryItemPatch,
    ) -> Result<ClassifiedItem, AppError> {
        let item = self
            .items
            .update(user_id, id, patch)
            .await?
            .ok_or_else(|| item_not_found(id))?;
        Ok(self.classify(item))
    }

    /// Marks an item as used up. It disappears from default listings and stats.
    pub async fn finish(&self, user_id: i64, id: i64) -> Result<ClassifiedItem, AppError> {
        let patch = InventoryItemPatch {
            is_finished: Some(true),
            ..Default::default()
        };
        self.update(user_id, id, patch).await
    }

    pub async fn delete(&self, user_id: i64, id: i64) -> Result<(), AppError> {
        if self.items.delete(user_id, id).await? {
            info!(item_id = id, user_id, "Inventory item deleted");
            Ok(())
        } else {
            Err(item_not_found(id))
        }
    }

    fn classify(&self, item: InventoryItem) -> ClassifiedItem {
        ClassifiedItem::new(item, Utc::now(), self.soon_within_days)
    }
}
