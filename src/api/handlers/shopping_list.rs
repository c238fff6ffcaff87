//! Handlers for shopping list endpoints.
//!
//! Item routes without a list id act on the user's current list.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::message::{DeletedCountResponse, MessageResponse};
use crate::api::dto::shopping_list::{
    AddFromInventoryRequest, AddItemRequest, CreateListRequest, GenerateFromRecipesRequest,
    ItemEnvelope, ItemStatusQuery, ItemsResponse, ListEnvelope, ListsResponse, PurchasedRequest,
    UpdateItemRequest, UpdateListRequest,
};
use crate::domain::entities::{ItemStatus, User};
use crate::error::AppError;
use crate::state::AppState;

fn generated(count: usize) -> Option<String> {
    Some(if count == 0 {
        "No hay productos nuevos que añadir".to_string()
    } else {
        format!("{count} productos añadidos a la lista de compras")
    })
}

/// Current list with its items, created on first use.
///
/// `GET /v1/shopping-list`
pub async fn current_list_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ListEnvelope>, AppError> {
    let full = state.shopping_list_service.current(user.id).await?;
    Ok(Json(ListEnvelope {
        message: None,
        shopping_list: full.into(),
    }))
}

/// `GET /v1/shopping-list/all`
pub async fn all_lists_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ListsResponse>, AppError> {
    let lists = state.shopping_list_service.all(user.id).await?;
    Ok(Json(ListsResponse {
        shopping_lists: lists.into_iter().map(Into::into).collect(),
    }))
}

/// `POST /v1/shopping-list`
pub async fn create_list_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateListRequest>,
) -> Result<(StatusCode, Json<ListEnvelope>), AppError> {
    payload.validate()?;

    let list = state
        .shopping_list_service
        .create(user.id, payload.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ListEnvelope {
            message: Some("Lista de compras creada".to_string()),
            shopping_list: list.into(),
        }),
    ))
}

/// `GET /v1/shopping-list/{id}`
pub async fn get_list_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<ListEnvelope>, AppError> {
    let full = state.shopping_list_service.get(user.id, id).await?;
    Ok(Json(ListEnvelope {
        message: None,
        shopping_list: full.into(),
    }))
}

/// `PUT /v1/shopping-list/{id}`
pub async fn update_list_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateListRequest>,
) -> Result<Json<ListEnvelope>, AppError> {
    payload.validate()?;

    let list = state
        .shopping_list_service
        .update(user.id, id, payload.into())
        .await?;

    Ok(Json(ListEnvelope {
        message: Some("Lista de compras actualizada".to_string()),
        shopping_list: list.into(),
    }))
}

/// `DELETE /v1/shopping-list/{id}`
pub async fn delete_list_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.shopping_list_service.delete(user.id, id).await?;
    Ok(Json(MessageResponse::new("Lista de compras eliminada")))
}

/// `GET /v1/shopping-list/items?status=pending|purchased`
pub async fn list_items_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<ItemStatusQuery>,
) -> Result<Json<ItemsResponse>, AppError> {
    let items = state
        .shopping_list_service
        .items(user.id, query.status)
        .await?;
    Ok(Json(ItemsResponse::new(None, items)))
}

/// `GET /v1/shopping-list/items/pending`
pub async fn pending_items_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ItemsResponse>, AppError> {
    let items = state
        .shopping_list_service
        .items(user.id, ItemStatus::Pending)
        .await?;
    Ok(Json(ItemsResponse::new(None, items)))
}

/// `GET /v1/shopping-list/items/purchased`
pub async fn purchased_items_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ItemsResponse>, AppError> {
    let items = state
        .shopping_list_service
        .items(user.id, ItemStatus::Purchased)
        .await?;
    Ok(Json(ItemsResponse::new(None, items)))
}

/// `POST /v1/shopping-list/items`
pub async fn add_item_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<ItemEnvelope>), AppError> {
    payload.validate()?;

    let item = state
        .shopping_list_service
        .add_item(user.id, payload.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ItemEnvelope {
            message: Some("Producto añadido a la lista".to_string()),
            item: item.into(),
        }),
    ))
}

/// `PUT /v1/shopping-list/items/{item_id}`
pub async fn update_item_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(item_id): Path<i64>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<Json<ItemEnvelope>, AppError> {
    payload.validate()?;

    let item = state
        .shopping_list_service
        .update_item(user.id, item_id, payload.into())
        .await?;

    Ok(Json(ItemEnvelope {
        message: Some("Producto actualizado".to_string()),
        item: item.into(),
    }))
}

/// `PUT /v1/shopping-list/items/{item_id}/purchased`
pub async fn set_purchased_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(item_id): Path<i64>,
    Json(payload): Json<PurchasedRequest>,
) -> Result<Json<ItemEnvelope>, AppError> {
    let item = state
        .shopping_list_service
        .set_purchased(user.id, item_id, payload.purchased)
        .await?;

    Ok(Json(ItemEnvelope {
        message: None,
        item: item.into(),
    }))
}

/// `DELETE /v1/shopping-list/items/{item_id}`
pub async fn delete_item_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(item_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .shopping_list_service
        .delete_item(user.id, item_id)
        .await?;
    Ok(Json(MessageResponse::new("Producto eliminado de la lista")))
}

/// `DELETE /v1/shopping-list/items/purchased`
pub async fn clear_purchased_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<DeletedCountResponse>, AppError> {
    let deleted = state.shopping_list_service.clear(user.id, true).await?;
    Ok(Json(DeletedCountResponse {
        message: "Productos comprados eliminados".to_string(),
        deleted,
    }))
}

/// `DELETE /v1/shopping-list/items`
pub async fn clear_items_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<DeletedCountResponse>, AppError> {
    let deleted = state.shopping_list_service.clear(user.id, false).await?;
    Ok(Json(DeletedCountResponse {
        message: "Lista de compras vaciada".to_string(),
        deleted,
    }))
}

/// `POST /v1/shopping-list/generate-from-inventory`
pub async fn generate_from_inventory_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ItemsResponse>, AppError> {
    let added = state
        .shopping_list_service
        .generate_from_inventory(user.id)
        .await?;
    Ok(Json(ItemsResponse::new(generated(added.len()), added)))
}

/// `POST /v1/shopping-list/generate-from-recipes`
pub async fn generate_from_recipes_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<GenerateFromRecipesRequest>,
) -> Result<Json<ItemsResponse>, AppError> {
    payload.validate()?;

    let added = state
        .shopping_list_service
        .generate_from_recipes(user.id, &payload.recipe_ids)
        .await?;
    Ok(Json(ItemsResponse::new(generated(added.len()), added)))
}

/// `POST /v1/shopping-list/add-from-inventory`
pub async fn add_from_inventory_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<AddFromInventoryRequest>,
) -> Result<Json<ItemsResponse>, AppError> {
    payload.validate()?;

    let added = state
        .shopping_list_service
        .add_from_inventory(user.id, &payload.inventory_item_ids)
        .await?;
    Ok(Json(ItemsResponse::new(generated(added.len()), added)))
}
