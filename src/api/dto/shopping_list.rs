//! DTOs for the shopping list endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::dto::{datetime, trimmed};
use crate::application::services::ListWithItems;
use crate::domain::entities::{
    DEFAULT_LIST_NAME, DEFAULT_UNIT, ItemStatus, NewShoppingList, NewShoppingListItem, Priority,
    ShoppingList, ShoppingListItem, ShoppingListItemPatch, ShoppingListPatch,
};

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateListRequest {
    #[serde(default, deserialize_with = "trimmed::optional")]
    #[validate(length(max = 100, message = "El nombre es demasiado largo"))]
    pub name: Option<String>,

    pub notes: Option<String>,

    #[serde(default, deserialize_with = "datetime::optional")]
    pub planned_date: Option<DateTime<Utc>>,

    pub store: Option<String>,

    #[validate(range(min = 0.0, max = 99_999_999.99, message = "Presupuesto fuera de rango"))]
    pub budget: Option<f64>,
}

impl From<CreateListRequest> for NewShoppingList {
    fn from(req: CreateListRequest) -> Self {
        NewShoppingList {
            name: req
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| DEFAULT_LIST_NAME.to_string()),
            notes: req.notes,
            planned_date: req.planned_date,
            store: req.store,
            budget: req.budget,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListRequest {
    #[serde(default, deserialize_with = "trimmed::optional")]
    #[validate(length(min = 1, max = 100, message = "El nombre no puede estar vacío"))]
    pub name: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub notes: Option<Option<String>>,

    pub is_active: Option<bool>,

    #[serde(default, deserialize_with = "datetime::double_optional")]
    pub planned_date: Option<Option<DateTime<Utc>>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub store: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(range(min = 0.0, max = 99_999_999.99, message = "Presupuesto fuera de rango"))]
    pub budget: Option<Option<f64>>,

    pub is_complete: Option<bool>,
}

impl From<UpdateListRequest> for ShoppingListPatch {
    fn from(req: UpdateListRequest) -> Self {
        ShoppingListPatch {
            name: req.name,
            notes: req.notes,
            is_active: req.is_active,
            planned_date: req.planned_date,
            store: req.store,
            budget: req.budget,
            is_complete: req.is_complete,
        }
    }
}

/// Request body for `POST /v1/shopping-list/items`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    #[serde(deserialize_with = "trimmed::string")]
    #[validate(length(min = 1, max = 200, message = "El nombre es obligatorio"))]
    pub name: String,

    #[validate(range(min = 0.0, max = 99_999_999.99, message = "Cantidad fuera de rango"))]
    pub quantity: Option<f64>,

    pub unit: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub priority: Option<Priority>,

    #[validate(range(min = 0.0, max = 99_999_999.99, message = "Precio fuera de rango"))]
    pub price: Option<f64>,

    pub inventory_item_id: Option<i64>,
    pub recipe_id: Option<i64>,
}

impl From<AddItemRequest> for NewShoppingListItem {
    fn from(req: AddItemRequest) -> Self {
        NewShoppingListItem {
            name: req.name,
            quantity: req.quantity.unwrap_or(1.0),
            unit: req
                .unit
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            category: req.category,
            notes: req.notes,
            priority: req.priority.unwrap_or_default(),
            price: req.price,
            inventory_id: req.inventory_item_id,
            recipe_id: req.recipe_id,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    #[serde(default, deserialize_with = "trimmed::optional")]
    #[validate(length(min = 1, max = 200, message = "El nombre no puede estar vacío"))]
    pub name: Option<String>,

    #[validate(range(min = 0.0, max = 99_999_999.99, message = "Cantidad fuera de rango"))]
    pub quantity: Option<f64>,

    pub unit: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub category: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub notes: Option<Option<String>>,

    pub priority: Option<Priority>,
    pub is_purchased: Option<bool>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(range(min = 0.0, max = 99_999_999.99, message = "Precio fuera de rango"))]
    pub price: Option<Option<f64>>,
}

impl From<UpdateItemRequest> for ShoppingListItemPatch {
    fn from(req: UpdateItemRequest) -> Self {
        ShoppingListItemPatch {
            name: req.name,
            quantity: req.quantity,
            unit: req.unit.filter(|u| !u.trim().is_empty()),
            category: req.category,
            notes: req.notes,
            priority: req.priority,
            is_purchased: req.is_purchased,
            price: req.price,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PurchasedRequest {
    pub purchased: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ItemStatusQuery {
    #[serde(default)]
    pub status: ItemStatus,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFromRecipesRequest {
    #[validate(length(min = 1, message = "Selecciona al menos una receta"))]
    pub recipe_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddFromInventoryRequest {
    #[validate(length(min = 1, message = "Selecciona al menos un producto"))]
    pub inventory_item_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemResponse {
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
    pub inventory_item_id: Option<i64>,
    pub recipe_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ShoppingListItem> for ListItemResponse {
    fn from(i: ShoppingListItem) -> Self {
        Self {
            id: i.id,
            shopping_list_id: i.shopping_list_id,
            name: i.name,
            quantity: i.quantity,
            unit: i.unit,
            category: i.category,
            notes: i.notes,
            priority: i.priority,
            is_purchased: i.is_purchased,
            price: i.price,
            inventory_item_id: i.inventory_id,
            recipe_id: i.recipe_id,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub id: i64,
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
    /// Present when the list is returned together with its items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ListItemResponse>>,
}

impl From<ShoppingList> for ListResponse {
    fn from(l: ShoppingList) -> Self {
        Self {
            id: l.id,
            name: l.name,
            notes: l.notes,
            is_active: l.is_active,
            planned_date: l.planned_date,
            store: l.store,
            budget: l.budget,
            is_complete: l.is_complete,
            completed_at: l.completed_at,
            created_at: l.created_at,
            updated_at: l.updated_at,
            items: None,
        }
    }
}

impl From<ListWithItems> for ListResponse {
    fn from(full: ListWithItems) -> Self {
        let mut response = ListResponse::from(full.list);
        response.items = Some(full.items.into_iter().map(Into::into).collect());
        response
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub shopping_list: ListResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListsResponse {
    pub shopping_lists: Vec<ListResponse>,
}

#[derive(Debug, Serialize)]
pub struct ItemEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub item: ListItemResponse,
}

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub items: Vec<ListItemResponse>,
}

impl ItemsResponse {
    pub fn new(message: Option<String>, items: Vec<ShoppingListItem>) -> Self {
        Self {
            message,
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_list_defaults_name() {
        let list = NewShoppingList::from(CreateListRequest::default());
        assert_eq!(list.name, DEFAULT_LIST_NAME);
    }

    #[test]
    fn test_add_item_defaults() {
        let req: AddItemRequest = serde_json::from_str(r#"{"name":"Pan"}"#).unwrap();
        let item = NewShoppingListItem::from(req);
        assert_eq!(item.quantity, 1.0);
        assert_eq!(item.unit, DEFAULT_UNIT);
        assert_eq!(item.priority, Priority::Medium);
    }

    #[test]
    fn test_add_item_reads_spanish_priority() {
        let req: AddItemRequest =
            serde_json::from_str(r#"{"name":"Pan","priority":"alta","inventoryItemId":3}"#).unwrap();
        let item = NewShoppingListItem::from(req);
        assert_eq!(item.priority, Priority::High);
        assert_eq!(item.inventory_id, Some(3));
    }

    #[test]
    fn test_status_query_defaults_to_all() {
        let q: ItemStatusQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.status, ItemStatus::All);
        let q: ItemStatusQuery = serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert_eq!(q.status, ItemStatus::Pending);
    }

    #[test]
    fn test_generate_requires_ids() {
        let req: GenerateFromRecipesRequest = serde_json::from_str(r#"{"recipeIds":[]}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_list_with_items_serializes_items() {
        let list = crate::domain::entities::shopping_list::sample_list(1, 1);
        let item = crate::domain::entities::shopping_list::sample_list_item(1, 1, "Pan", false);
        let body = serde_json::to_value(ListResponse::from(ListWithItems {
            list: list.clone(),
            items: vec![item],
        }))
        .unwrap();
        assert_eq!(body["items"][0]["name"], "Pan");

        let bare = serde_json::to_value(ListResponse::from(list)).unwrap();
        assert!(bare.get("items").is_none());
    }
}
