//! Shopping list and shopping list item entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Name given to the list created on demand as the user's current list.
pub const DEFAULT_LIST_NAME: &str = "Lista de compras";

/// Item priority. Stored and serialized with the Spanish labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "baja")]
    Low,
    #[default]
    #[serde(rename = "media")]
    Medium,
    #[serde(rename = "alta")]
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "baja",
            Priority::Medium => "media",
            Priority::High => "alta",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "baja" => Ok(Priority::Low),
            "media" => Ok(Priority::Medium),
            "alta" => Ok(Priority::High),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShoppingList {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub notes: Option<String>,
    pub is_active: bool,
    pub planned_date: Option<DateTime<Utc>>,
    pub store: Option<String>,
    pub budget: Option<f64>,
    pub is_complete: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ShoppingListItem {
    pub id: i64,
    pub shopping_list_id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub priority: Priority,
    pub is_purchased: bool,
    pub price: Option<f64>,
    pub inventory_id: Option<i64>,
    pub recipe_id: Option<i64>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewShoppingList {
    pub name: String,
    pub notes: Option<String>,
    pub planned_date: Option<DateTime<Utc>>,
    pub store: Option<String>,
    pub budget: Option<f64>,
}

/// Partial update for a list. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ShoppingListPatch {
    pub name: Option<String>,
    pub notes: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub planned_date: Option<Option<DateTime<Utc>>>,
    pub store: Option<Option<String>>,
    pub budget: Option<Option<f64>>,
    pub is_complete: Option<bool>,
}

impl ShoppingListPatch {
    /// Applies the patch. Completing a list stamps `completed_at`; reopening clears it.
    pub fn apply_to(self, list: &mut ShoppingList, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            list.name = name;
        }
        if let Some(notes) = self.notes {
            list.notes = notes;
        }
        if let Some(is_active) = self.is_active {
            list.is_active = is_active;
        }
        if let Some(planned_date) = self.planned_date {
            list.planned_date = planned_date;
        }
        if let Some(store) = self.store {
            list.store = store;
        }
        if let Some(budget) = self.budget {
            list.budget = budget;
        }
        if let Some(is_complete) = self.is_complete {
            if is_complete && !list.is_complete {
                list.completed_at = Some(now);
            } else if !is_complete {
                list.completed_at = None;
            }
            list.is_complete = is_complete;
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewShoppingListItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub priority: Priority,
    pub price: Option<f64>,
    pub inventory_id: Option<i64>,
    pub recipe_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct ShoppingListItemPatch {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub is_purchased: Option<bool>,
    pub price: Option<Option<f64>>,
}

impl ShoppingListItemPatch {
    pub fn apply_to(self, item: &mut ShoppingListItem) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(unit) = self.unit {
            item.unit = unit;
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(notes) = self.notes {
            item.notes = notes;
        }
        if let Some(priority) = self.priority {
            item.priority = priority;
        }
        if let Some(is_purchased) = self.is_purchased {
            item.is_purchased = is_purchased;
        }
        if let Some(price) = self.price {
            item.price = price;
        }
    }
}

/// Which items of a list to return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    All,
    Pending,
    Purchased,
}

impl ItemStatus {
    pub fn matches(self, item: &ShoppingListItem) -> bool {
        match self {
            ItemStatus::All => true,
            ItemStatus::Pending => !item.is_purchased,
            ItemStatus::Purchased => item.is_purchased,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_list(id: i64, user_id: i64) -> ShoppingList {
    let now = Utc::now();
    ShoppingList {
        id,
        user_id,
        name: DEFAULT_LIST_NAME.to_string(),
        notes: None,
        is_active: true,
        planned_date: None,
        store: None,
        budget: None,
        is_complete: false,
        completed_at: None,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
pub(crate) fn sample_list_item(id: i64, list_id: i64, name: &str, purchased: bool) -> ShoppingListItem {
    let now = Utc::now();
    ShoppingListItem {
        id,
        shopping_list_id: list_id,
        name: name.to_string(),
        quantity: 1.0,
        unit: "unidad".to_string(),
        category: None,
        notes: None,
        priority: Priority::Medium,
        is_purchased: purchased,
        price: None,
        inventory_id: None,
        recipe_id: None,
        position: id as i32,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completing_list_stamps_completed_at() {
        let now = Utc::now();
        let mut list = sample_list(1, 1);

        ShoppingListPatch {
            is_complete: Some(true),
            ..Default::default()
        }
        .apply_to(&mut list, now);
        assert!(list.is_complete);
        assert_eq!(list.completed_at, Some(now));

        ShoppingListPatch {
            is_complete: Some(false),
            ..Default::default()
        }
        .apply_to(&mut list, now);
        assert!(!list.is_complete);
        assert!(list.completed_at.is_none());
    }

    #[test]
    fn test_item_status_matches() {
        let pending = sample_list_item(1, 1, "pan", false);
        let bought = sample_list_item(2, 1, "leche", true);

        assert!(ItemStatus::All.matches(&pending) && ItemStatus::All.matches(&bought));
        assert!(ItemStatus::Pending.matches(&pending) && !ItemStatus::Pending.matches(&bought));
        assert!(ItemStatus::Purchased.matches(&bought) && !ItemStatus::Purchased.matches(&pending));
    }

    #[test]
    fn test_priority_labels() {
        assert_eq!("alta".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(Priority::default().as_str(), "media");
    }
}
