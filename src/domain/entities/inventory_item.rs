//! Inventory item entity.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::expiration::{self, ExpirationStatus};

/// Unit applied when the client omits one.
pub const DEFAULT_UNIT: &str = "unidad";

/// Storage location applied when the client omits one.
pub const DEFAULT_LOCATION: &str = "despensa";

/// A product in a user's pantry.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub barcode: Option<String>,
    pub category: String,
    pub quantity: f64,
    pub unit: String,
    pub expiration_date: Option<DateTime<Utc>>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub location: String,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub nutritional_info: Option<Value>,
    pub is_finished: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Expiration label of this item relative to `now`.
    pub fn expiration_status(&self, now: DateTime<Utc>, soon_within_days: i64) -> ExpirationStatus {
        expiration::classify(self.expiration_date, now, soon_within_days)
    }

    /// Finished items and items at or below `threshold` need restocking.
    pub fn needs_restock(&self, threshold: f64) -> bool {
        self.is_finished || self.quantity <= threshold
    }
}

/// Input data for creating an inventory item.
#[derive(Debug, Clone)]
pub struct NewInventoryItem {
    pub user_id: i64,
    pub name: String,
    pub barcode: Option<String>,
    pub category: String,
    pub quantity: f64,
    pub unit: String,
    pub expiration_date: Option<DateTime<Utc>>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub location: String,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub nutritional_info: Option<Value>,
}

/// Partial update for an inventory item.
///
/// `None` fields are left unchanged. For nullable columns `Some(None)` clears
/// the value and `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default)]
pub struct InventoryItemPatch {
    pub name: Option<String>,
    pub barcode: Option<Option<String>>,
    pub category: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub expiration_date: Option<Option<DateTime<Utc>>>,
    pub purchase_date: Option<Option<DateTime<Utc>>>,
    pub location: Option<String>,
    pub notes: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub nutritional_info: Option<Option<Value>>,
    pub is_finished: Option<bool>,
}

impl InventoryItemPatch {
    /// Applies the patch to an item in place.
    pub fn apply_to(self, item: &mut InventoryItem) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(barcode) = self.barcode {
            item.barcode = barcode;
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(unit) = self.unit {
            item.unit = unit;
        }
        if let Some(expiration_date) = self.expiration_date {
            item.expiration_date = expiration_date;
        }
        if let Some(purchase_date) = self.purchase_date {
            item.purchase_date = purchase_date;
        }
        if let Some(location) = self.location {
            item.location = location;
        }
        if let Some(notes) = self.notes {
            item.notes = notes;
        }
        if let Some(image_url) = self.image_url {
            item.image_url = image_url;
        }
        if let Some(nutritional_info) = self.nutritional_info {
            item.nutritional_info = nutritional_info;
        }
        if let Some(is_finished) = self.is_finished {
            item.is_finished = is_finished;
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_item(id: i64, name: &str, category: &str, location: &str) -> InventoryItem {
    let now = Utc::now();
    InventoryItem {
        id,
        user_id: 1,
        name: name.to_string(),
        barcode: None,
        category: category.to_string(),
        quantity: 1.0,
        unit: DEFAULT_UNIT.to_string(),
        expiration_date: None,
        purchase_date: None,
        location: location.to_string(),
        notes: None,
        image_url: None,
        nutritional_info: None,
        is_finished: false,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiration_status_uses_item_date() {
        let now = Utc::now();
        let mut item = sample_item(1, "Leche", "Lácteos", "nevera");
        assert_eq!(item.expiration_status(now, 3), ExpirationStatus::Unknown);

        item.expiration_date = Some(now - Duration::days(1));
        assert_eq!(item.expiration_status(now, 3), ExpirationStatus::Expired);

        item.expiration_date = Some(now + Duration::days(10));
        assert_eq!(item.expiration_status(now, 3), ExpirationStatus::Ok);
    }

    #[test]
    fn test_needs_restock() {
        let mut item = sample_item(1, "Arroz", "Cereales", "despensa");
        item.quantity = 5.0;
        assert!(!item.needs_restock(1.0));

        item.quantity = 1.0;
        assert!(item.needs_restock(1.0));

        item.quantity = 5.0;
        item.is_finished = true;
        assert!(item.needs_restock(1.0));
    }

    #[test]
    fn test_patch_sets_and_clears_fields() {
        let mut item = sample_item(1, "Yogur", "Lácteos", "nevera");
        item.notes = Some("natural".to_string());
        item.expiration_date = Some(Utc::now());

        InventoryItemPatch {
            name: Some("Yogur griego".to_string()),
            quantity: Some(4.0),
            notes: Some(None),
            expiration_date: Some(None),
            ..Default::default()
        }
        .apply_to(&mut item);

        assert_eq!(item.name, "Yogur griego");
        assert_eq!(item.quantity, 4.0);
        assert!(item.notes.is_none());
        assert!(item.expiration_date.is_none());
        assert_eq!(item.category, "Lácteos");
    }
}
