//! DTOs for the recipe endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::api::dto::trimmed;
use crate::domain::entities::{
    DEFAULT_UNIT, Difficulty, NewRecipe, NewRecipeIngredient, Recipe, RecipeFilter,
    RecipeIngredient, RecipePatch,
};
use crate::domain::recommendation::RecipeMatch;
use crate::error::AppError;

/// Query parameters for `GET /v1/recipes`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeQuery {
    /// Title substring.
    pub q: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub max_time: Option<i32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub favorites: Option<bool>,
}

impl TryFrom<RecipeQuery> for RecipeFilter {
    type Error = AppError;

    fn try_from(query: RecipeQuery) -> Result<Self, Self::Error> {
        let difficulty = query
            .difficulty
            .filter(|d| !d.trim().is_empty())
            .map(|d| d.parse::<Difficulty>())
            .transpose()
            .map_err(|e| AppError::bad_request("Dificultad inválida", json!({ "reason": e })))?;

        Ok(RecipeFilter {
            search: query.q.filter(|s| !s.trim().is_empty()),
            category: query.category.filter(|s| !s.trim().is_empty()),
            difficulty,
            max_time: query.max_time,
            favorites_only: query.favorites.unwrap_or(false),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRequest {
    #[serde(deserialize_with = "trimmed::string")]
    #[validate(length(min = 1, max = 200, message = "El ingrediente necesita un nombre"))]
    pub name: String,

    #[validate(range(min = 0.0, max = 99_999_999.99, message = "Cantidad fuera de rango"))]
    pub quantity: Option<f64>,

    pub unit: Option<String>,
    pub notes: Option<String>,

    #[serde(default)]
    pub is_optional: bool,

    pub inventory_item_id: Option<i64>,
}

impl From<IngredientRequest> for NewRecipeIngredient {
    fn from(req: IngredientRequest) -> Self {
        NewRecipeIngredient {
            name: req.name,
            quantity: req.quantity.unwrap_or(1.0),
            unit: req
                .unit
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            notes: req.notes,
            is_optional: req.is_optional,
            inventory_id: req.inventory_item_id,
        }
    }
}

/// Request body for `POST /v1/recipes`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeRequest {
    #[serde(deserialize_with = "trimmed::string")]
    #[validate(length(min = 1, max = 200, message = "El título es obligatorio"))]
    pub title: String,

    pub description: Option<String>,

    #[serde(deserialize_with = "trimmed::string")]
    #[validate(length(min = 1, message = "Las instrucciones son obligatorias"))]
    pub instructions: String,

    #[validate(range(min = 0, message = "El tiempo de preparación no puede ser negativo"))]
    pub preparation_time: Option<i32>,

    #[validate(range(min = 1, message = "Las raciones deben ser al menos 1"))]
    pub servings: Option<i32>,

    pub difficulty: Option<Difficulty>,

    #[validate(url(message = "URL de imagen inválida"))]
    pub image_url: Option<String>,

    #[serde(default)]
    pub categories: Vec<String>,

    pub nutritional_info: Option<Value>,
    pub source: Option<String>,
    pub notes: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub ingredients: Vec<IngredientRequest>,
}

impl From<CreateRecipeRequest> for NewRecipe {
    fn from(req: CreateRecipeRequest) -> Self {
        NewRecipe {
            title: req.title,
            description: req.description,
            instructions: req.instructions,
            preparation_time: req.preparation_time,
            servings: req.servings,
            difficulty: req.difficulty.unwrap_or_default(),
            image_url: req.image_url,
            categories: req.categories,
            nutritional_info: req.nutritional_info.filter(|v| !v.is_null()),
            source: req.source,
            notes: req.notes,
            ingredients: req.ingredients.into_iter().map(Into::into).collect(),
        }
    }
}

/// Request body for `PUT /v1/recipes/{id}`. A present `ingredients` list replaces the stored one.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipeRequest {
    #[serde(default, deserialize_with = "trimmed::optional")]
    #[validate(length(min = 1, max = 200, message = "El título no puede estar vacío"))]
    pub title: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "trimmed::optional")]
    #[validate(length(min = 1, message = "Las instrucciones no pueden estar vacías"))]
    pub instructions: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub preparation_time: Option<Option<i32>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub servings: Option<Option<i32>>,

    pub difficulty: Option<Difficulty>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub image_url: Option<Option<String>>,

    pub categories: Option<Vec<String>>,
    pub is_favorite: Option<bool>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub nutritional_info: Option<Option<Value>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub source: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub notes: Option<Option<String>>,

    #[validate(nested)]
    pub ingredients: Option<Vec<IngredientRequest>>,
}

impl From<UpdateRecipeRequest> for RecipePatch {
    fn from(req: UpdateRecipeRequest) -> Self {
        RecipePatch {
            title: req.title,
            description: req.description,
            instructions: req.instructions,
            preparation_time: req.preparation_time,
            servings: req.servings,
            difficulty: req.difficulty,
            image_url: req.image_url,
            categories: req.categories,
            is_favorite: req.is_favorite,
            nutritional_info: req.nutritional_info,
            source: req.source,
            notes: req.notes,
            ingredients: req
                .ingredients
                .map(|list| list.into_iter().map(Into::into).collect()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientResponse {
    pub id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub notes: Option<String>,
    pub is_optional: bool,
    pub inventory_item_id: Option<i64>,
}

impl From<RecipeIngredient> for IngredientResponse {
    fn from(i: RecipeIngredient) -> Self {
        Self {
            id: i.id,
            name: i.name,
            quantity: i.quantity,
            unit: i.unit,
            notes: i.notes,
            is_optional: i.is_optional,
            inventory_item_id: i.inventory_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub instructions: String,
    pub preparation_time: Option<i32>,
    pub servings: Option<i32>,
    pub difficulty: Difficulty,
    pub image_url: Option<String>,
    pub categories: Vec<String>,
    pub is_favorite: bool,
    pub nutritional_info: Option<Value>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub ingredients: Vec<IngredientResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Recipe> for RecipeResponse {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id,
            title: r.title,
            description: r.description,
            instructions: r.instructions,
            preparation_time: r.preparation_time,
            servings: r.servings,
            difficulty: r.difficulty,
            image_url: r.image_url,
            categories: r.categories,
            is_favorite: r.is_favorite,
            nutritional_info: r.nutritional_info,
            source: r.source,
            notes: r.notes,
            ingredients: r.ingredients.into_iter().map(Into::into).collect(),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub recipe: RecipeResponse,
}

#[derive(Debug, Serialize)]
pub struct RecipeListResponse {
    pub recipes: Vec<RecipeResponse>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// A recipe with how much of it the pantry already covers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedRecipe {
    #[serde(flatten)]
    pub recipe: RecipeResponse,
    pub available_ingredients: usize,
    pub required_ingredients: usize,
    pub match_score: f64,
}

impl From<RecipeMatch> for RecommendedRecipe {
    fn from(m: RecipeMatch) -> Self {
        Self {
            recipe: m.recipe.into(),
            available_ingredients: m.matched,
            required_ingredients: m.required,
            match_score: m.score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendedResponse {
    pub recipes: Vec<RecommendedRecipe>,
}
