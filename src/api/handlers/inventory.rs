//! Handlers for pantry inventory endpoints.
//!
//! Every handler runs behind the auth middleware and only sees the items of
//! the authenticated user.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::inventory::{
    CreateItemRequest, InventoryQuery, ItemEnvelope, ItemListResponse, ProductResponse,
    StatsResponse, UpdateItemRequest,
};
use crate::api::dto::message::MessageResponse;
use crate::domain::entities::User;
use crate::error::AppError;
use crate::state::AppState;

/// Lists items through the filter, sort and pagination pipeline.
///
/// # Endpoint
///
/// `GET /v1/inventory`
///
/// # Query Parameters
///
/// - `category`, `location` (optional): exact match
/// - `search` (optional): case-insensitive name substring
/// - `expirationStatus` (optional): `expired`, `soon`, `ok`, `unknown` or `all`
/// - `includeFinished` (optional): include used-up items (default: false)
/// - `sortBy` (optional): `name`, `expirationDate`, `category`, `location`,
///   `quantity`, `createdAt` (default)
/// - `sortOrder` (optional): `asc` or `desc` (default)
/// - `page` (optional): page number (default: 1)
/// - `limit` (optional): page size (default: 20, max: 100)
pub async fn list_items_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(params): Query<InventoryQuery>,
) -> Result<Json<ItemListResponse>, AppError> {
    let query = params.into_list_query()?;
    let page = state.inventory_service.list(user.id, query).await?;

    Ok(Json(ItemListResponse {
        items: page.items.into_iter().map(Into::into).collect(),
        pagination: page.info,
    }))
}

/// `GET /v1/inventory/stats`
pub async fn stats_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.inventory_service.stats(user.id).await?;
    Ok(Json(stats.into()))
}

/// Looks up product data for a barcode. Results are cached.
///
/// `GET /v1/inventory/barcode/{barcode}`
pub async fn barcode_handler(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
) -> Result<Json<ProductResponse>, AppError> {
    let product_info = state.product_service.lookup(&barcode).await?;
    Ok(Json(ProductResponse { product_info }))
}

/// `GET /v1/inventory/{id}`
pub async fn get_item_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<ItemEnvelope>, AppError> {
    let item = state.inventory_service.get(user.id, id).await?;
    Ok(Json(ItemEnvelope::new(item)))
}

/// `POST /v1/inventory`
pub async fn create_item_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ItemEnvelope>), AppError> {
    payload.validate()?;

    let item = state
        .inventory_service
        .create(payload.into_new_item(user.id))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ItemEnvelope::with_message(
            "Producto añadido al inventario",
            item,
        )),
    ))
}

/// `PUT /v1/inventory/{id}`
pub async fn update_item_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<Json<ItemEnvelope>, AppError> {
    payload.validate()?;

    let item = state
        .inventory_service
        .update(user.id, id, payload.into())
        .await?;

    Ok(Json(ItemEnvelope::with_message("Producto actualizado", item)))
}

/// `DELETE /v1/inventory/{id}`
pub async fn delete_item_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.inventory_service.delete(user.id, id).await?;
    Ok(Json(MessageResponse::new("Producto eliminado del inventario")))
}

/// Marks an item as used up.
///
/// `PATCH /v1/inventory/{id}/finish`
pub async fn finish_item_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<ItemEnvelope>, AppError> {
    let item = state.inventory_service.finish(user.id, id).await?;
    Ok(Json(ItemEnvelope::with_message(
        "Producto marcado como terminado",
        item,
    )))
}
