//! DTOs for the inventory endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::api::dto::{datetime, trimmed};
use crate::api::dto::pagination::PaginationParams;
use crate::application::services::{ClassifiedItem, InventoryStats, ListQuery};
use crate::domain::entities::{
    DEFAULT_LOCATION, DEFAULT_UNIT, InventoryItemPatch, NewInventoryItem, ProductInfo,
};
use crate::domain::expiration::ExpirationStatus;
use crate::domain::filter::{InventoryFilter, PageInfo, SortKey, SortOrder};
use crate::error::AppError;

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Query parameters for `GET /v1/inventory`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryQuery {
    pub category: Option<String>,
    pub location: Option<String>,
    /// `expired`, `soon`, `ok`, `unknown`; `all` or empty means no filter.
    pub expiration_status: Option<String>,
    pub search: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub include_finished: Option<bool>,

    pub sort_by: Option<SortKey>,
    pub sort_order: Option<SortOrder>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl InventoryQuery {
    pub fn into_list_query(self) -> Result<ListQuery, AppError> {
        let (page, limit) = self
            .pagination
            .validate()
            .map_err(|e| AppError::bad_request(e, json!({})))?;

        let expiration = match non_blank(self.expiration_status).as_deref() {
            None | Some("all") => None,
            Some(status) => Some(status.parse::<ExpirationStatus>().map_err(|e| {
                AppError::bad_request("Estado de caducidad inválido", json!({ "reason": e }))
            })?),
        };

        Ok(ListQuery {
            filter: InventoryFilter {
                category: non_blank(self.category),
                location: non_blank(self.location),
                search: non_blank(self.search),
                expiration,
                include_finished: self.include_finished.unwrap_or(false),
            },
            sort_by: self.sort_by.unwrap_or_default(),
            sort_order: self.sort_order.unwrap_or_default(),
            page,
            limit,
        })
    }
}

/// Request body for `POST /v1/inventory`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[serde(deserialize_with = "trimmed::string")]
    #[validate(length(min = 1, max = 200, message = "El nombre es obligatorio"))]
    pub name: String,

    pub barcode: Option<String>,

    #[serde(deserialize_with = "trimmed::string")]
    #[validate(length(min = 1, max = 100, message = "La categoría es obligatoria"))]
    pub category: String,

    #[validate(range(min = 0.0, max = 99_999_999.99, message = "Cantidad fuera de rango"))]
    pub quantity: Option<f64>,

    pub unit: Option<String>,

    #[serde(default, deserialize_with = "datetime::optional")]
    pub expiration_date: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "datetime::optional")]
    pub purchase_date: Option<DateTime<Utc>>,

    pub location: Option<String>,
    pub notes: Option<String>,

    #[validate(url(message = "URL de imagen inválida"))]
    pub image_url: Option<String>,

    pub nutritional_info: Option<Value>,
}

impl CreateItemRequest {
    pub fn into_new_item(self, user_id: i64) -> NewInventoryItem {
        NewInventoryItem {
            user_id,
            name: self.name,
            barcode: non_blank(self.barcode),
            category: self.category,
            quantity: self.quantity.unwrap_or(1.0),
            unit: non_blank(self.unit).unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            expiration_date: self.expiration_date,
            purchase_date: self.purchase_date,
            location: non_blank(self.location).unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            notes: self.notes,
            image_url: non_blank(self.image_url),
            nutritional_info: self.nutritional_info.filter(|v| !v.is_null()),
        }
    }
}

/// Request body for `PUT /v1/inventory/{id}`.
///
/// Absent fields are left unchanged; `null` clears nullable fields.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    #[serde(default, deserialize_with = "trimmed::optional")]
    #[validate(length(min = 1, max = 200, message = "El nombre no puede estar vacío"))]
    pub name: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub barcode: Option<Option<String>>,

    #[serde(default, deserialize_with = "trimmed::optional")]
    #[validate(length(min = 1, max = 100, message = "La categoría no puede estar vacía"))]
    pub category: Option<String>,

    #[validate(range(min = 0.0, max = 99_999_999.99, message = "Cantidad fuera de rango"))]
    pub quantity: Option<f64>,

    pub unit: Option<String>,

    #[serde(default, deserialize_with = "datetime::double_optional")]
    pub expiration_date: Option<Option<DateTime<Utc>>>,

    #[serde(default, deserialize_with = "datetime::double_optional")]
    pub purchase_date: Option<Option<DateTime<Utc>>>,

    pub location: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub notes: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub image_url: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub nutritional_info: Option<Option<Value>>,

    pub is_finished: Option<bool>,
}

impl From<UpdateItemRequest> for InventoryItemPatch {
    fn from(req: UpdateItemRequest) -> Self {
        InventoryItemPatch {
            name: req.name,
            barcode: req.barcode.map(non_blank),
            category: req.category,
            quantity: req.quantity,
            unit: non_blank(req.unit),
            expiration_date: req.expiration_date,
            purchase_date: req.purchase_date,
            location: non_blank(req.location),
            notes: req.notes,
            image_url: req.image_url,
            nutritional_info: req.nutritional_info,
            is_finished: req.is_finished,
        }
    }
}

/// An inventory item as returned to clients, with its computed expiration fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: i64,
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
    pub expiration_status: ExpirationStatus,
    pub days_until_expiration: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ClassifiedItem> for ItemResponse {
    fn from(classified: ClassifiedItem) -> Self {
        let item = classified.item;
        Self {
            id: item.id,
            name: item.name,
            barcode: item.barcode,
            category: item.category,
            quantity: item.quantity,
            unit: item.unit,
            expiration_date: item.expiration_date,
            purchase_date: item.purchase_date,
            location: item.location,
            notes: item.notes,
            image_url: item.image_url,
            nutritional_info: item.nutritional_info,
            is_finished: item.is_finished,
            expiration_status: classified.expiration_status,
            days_until_expiration: classified.days_until_expiration,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// `{ message?, item }` envelope for single-item responses.
#[derive(Debug, Serialize)]
pub struct ItemEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub item: ItemResponse,
}

impl ItemEnvelope {
    pub fn new(item: ClassifiedItem) -> Self {
        Self {
            message: None,
            item: item.into(),
        }
    }

    pub fn with_message(message: impl Into<String>, item: ClassifiedItem) -> Self {
        Self {
            message: Some(message.into()),
            item: item.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ItemListResponse {
    pub items: Vec<ItemResponse>,
    pub pagination: PageInfo,
}

#[derive(Debug, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct LocationCount {
    pub location: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsBody {
    pub total_items: usize,
    pub expired_items: usize,
    pub soon_to_expire_items: usize,
    pub items_by_category: Vec<CategoryCount>,
    pub items_by_location: Vec<LocationCount>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats: StatsBody,
}

impl From<InventoryStats> for StatsResponse {
    fn from(stats: InventoryStats) -> Self {
        Self {
            stats: StatsBody {
                total_items: stats.total_items,
                expired_items: stats.expired_items,
                soon_to_expire_items: stats.soon_to_expire_items,
                items_by_category: stats
                    .items_by_category
                    .into_iter()
                    .map(|(category, count)| CategoryCount { category, count })
                    .collect(),
                items_by_location: stats
                    .items_by_location
                    .into_iter()
                    .map(|(location, count)| LocationCount { location, count })
                    .collect(),
            },
        }
    }
}

/// Response for `GET /v1/inventory/barcode/{barcode}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub product_info: ProductInfo,
}
