//! Handlers for recipe endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::message::MessageResponse;
use crate::api::dto::recipes::{
    CategoriesResponse, CreateRecipeRequest, RecipeEnvelope, RecipeListResponse, RecipeQuery,
    RecommendedResponse, UpdateRecipeRequest,
};
use crate::domain::entities::{Recipe, RecipeFilter, User};
use crate::error::AppError;
use crate::state::AppState;

fn envelope(message: Option<&str>, recipe: Recipe) -> Json<RecipeEnvelope> {
    Json(RecipeEnvelope {
        message: message.map(str::to_string),
        recipe: recipe.into(),
    })
}

/// `GET /v1/recipes`
///
/// # Query Parameters
///
/// - `q` (optional): title substring
/// - `category` (optional)
/// - `difficulty` (optional): `fácil`, `medio` or `difícil`
/// - `maxTime` (optional): maximum preparation time in minutes
/// - `favorites` (optional): only favorites when `true`
pub async fn list_recipes_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(params): Query<RecipeQuery>,
) -> Result<Json<RecipeListResponse>, AppError> {
    let filter = RecipeFilter::try_from(params)?;
    let recipes = state.recipe_service.list(user.id, &filter).await?;

    Ok(Json(RecipeListResponse {
        recipes: recipes.into_iter().map(Into::into).collect(),
    }))
}

/// `GET /v1/recipes/categories`
pub async fn categories_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let categories = state.recipe_service.categories(user.id).await?;
    Ok(Json(CategoriesResponse { categories }))
}

/// `GET /v1/recipes/recommended`
pub async fn recommended_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<RecommendedResponse>, AppError> {
    let ranked = state.recipe_service.recommended(user.id).await?;
    Ok(Json(RecommendedResponse {
        recipes: ranked.into_iter().map(Into::into).collect(),
    }))
}

/// `GET /v1/recipes/{id}`
pub async fn get_recipe_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<RecipeEnvelope>, AppError> {
    let recipe = state.recipe_service.get(user.id, id).await?;
    Ok(envelope(None, recipe))
}

/// `POST /v1/recipes`
pub async fn create_recipe_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeEnvelope>), AppError> {
    payload.validate()?;

    let recipe = state.recipe_service.create(user.id, payload.into()).await?;
    Ok((StatusCode::CREATED, envelope(Some("Receta creada"), recipe)))
}

/// `PUT /v1/recipes/{id}`
pub async fn update_recipe_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRecipeRequest>,
) -> Result<Json<RecipeEnvelope>, AppError> {
    payload.validate()?;

    let recipe = state
        .recipe_service
        .update(user.id, id, payload.into())
        .await?;
    Ok(envelope(Some("Receta actualizada"), recipe))
}

/// `DELETE /v1/recipes/{id}`
pub async fn delete_recipe_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.recipe_service.delete(user.id, id).await?;
    Ok(Json(MessageResponse::new("Receta eliminada")))
}

/// `POST /v1/recipes/{id}/favorite`
pub async fn add_favorite_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<RecipeEnvelope>, AppError> {
    let recipe = state.recipe_service.set_favorite(user.id, id, true).await?;
    Ok(envelope(Some("Receta añadida a favoritos"), recipe))
}

/// `DELETE /v1/recipes/{id}/favorite`
pub async fn remove_favorite_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> Result<Json<RecipeEnvelope>, AppError> {
    let recipe = state.recipe_service.set_favorite(user.id, id, false).await?;
    Ok(envelope(Some("Receta eliminada de favoritos"), recipe))
}
