//! PostgreSQL implementation of the recipe repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{
    Difficulty, NewRecipe, NewRecipeIngredient, Recipe, RecipeIngredient, RecipePatch,
};
use crate::domain::repositories::RecipeRepository;
use crate::error::AppError;

const RECIPE_COLUMNS: &str = "id, user_id, title, description, instructions, preparation_time, \
     servings, difficulty, image_url, categories, is_favorite, nutritional_info, source, notes, \
     created_at, updated_at";

const INGREDIENT_COLUMNS: &str = "id, recipe_id, name, quantity::float8 AS quantity, unit, notes, \
     is_optional, inventory_id, position";

#[derive(sqlx::FromRow)]
struct RecipeRow {
    id: i64,
    user_id: i64,
    title: String,
    description: Option<String>,
    instructions: String,
    preparation_time: Option<i32>,
    servings: Option<i32>,
    difficulty: String,
    image_url: Option<String>,
    categories: Json<Vec<String>>,
    is_favorite: bool,
    nutritional_info: Option<Value>,
    source: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RecipeRow {
    fn into_recipe(self, ingredients: Vec<RecipeIngredient>) -> Result<Recipe, AppError> {
        let difficulty: Difficulty = self.difficulty.parse().map_err(|e: String| {
            tracing::error!(recipe_id = self.id, "Corrupt difficulty column: {}", e);
            AppError::internal("Error de base de datos", json!({}))
        })?;

        Ok(Recipe {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            instructions: self.instructions,
            preparation_time: self.preparation_time,
            servings: self.servings,
            difficulty,
            image_url: self.image_url,
            categories: self.categories.0,
            is_favorite: self.is_favorite,
            nutritional_info: self.nutritional_info,
            source: self.source,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
            ingredients,
        })
    }
}

#[derive(sqlx::FromRow)]
struct IngredientRow {
    id: i64,
    recipe_id: i64,
    name: String,
    quantity: f64,
    unit: String,
    notes: Option<String>,
    is_optional: bool,
    inventory_id: Option<i64>,
    position: i32,
}

impl From<IngredientRow> for RecipeIngredient {
    fn from(row: IngredientRow) -> Self {
        RecipeIngredient {
            id: row.id,
            recipe_id: row.recipe_id,
            name: row.name,
            quantity: row.quantity,
            unit: row.unit,
            notes: row.notes,
            is_optional: row.is_optional,
            inventory_id: row.inventory_id,
            position: row.position,
        }
    }
}

/// PostgreSQL repository for recipes and their ingredients.
pub struct PgRecipeRepository {
    pool: Arc<PgPool>,
}

impl PgRecipeRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Loads ingredients for `rows` and assembles the recipes, preserving row order.
    async fn assemble(&self, rows: Vec<RecipeRow>) -> Result<Vec<Recipe>, AppError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let sql = format!(
            "SELECT {INGREDIENT_COLUMNS} FROM recipe_ingredients \
             WHERE recipe_id = ANY($1) ORDER BY recipe_id, position, id"
        );
        let ingredient_rows = sqlx::query_as::<_, IngredientRow>(&sql)
            .bind(&ids)
            .fetch_all(self.pool.as_ref())
            .await?;

        let mut by_recipe: HashMap<i64, Vec<RecipeIngredient>> = HashMap::new();
        for row in ingredient_rows {
            by_recipe.entry(row.recipe_id).or_default().push(row.into());
        }

        rows.into_iter()
            .map(|row| {
                let ingredients = by_recipe.remove(&row.id).unwrap_or_default();
                row.into_recipe(ingredients)
            })
            .collect()
    }
}

async fn load_ingredients(
    conn: &mut PgConnection,
    recipe_id: i64,
) -> Result<Vec<RecipeIngredient>, AppError> {
    let sql = format!(
        "SELECT {INGREDIENT_COLUMNS} FROM recipe_ingredients \
         WHERE recipe_id = $1 ORDER BY position, id"
    );
    let rows = sqlx::query_as::<_, IngredientRow>(&sql)
        .bind(recipe_id)
        .fetch_all(conn)
        .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Inserts `ingredients` with positions following their order in the slice.
async fn insert_ingredients(
    conn: &mut PgConnection,
    recipe_id: i64,
    ingredients: &[NewRecipeIngredient],
) -> Result<Vec<RecipeIngredient>, AppError> {
    let sql = format!(
        "INSERT INTO recipe_ingredients \
         (recipe_id, name, quantity, unit, notes, is_optional, inventory_id, position) \
         VALUES ($1, $2, $3::numeric, $4, $5, $6, $7, $8) RETURNING {INGREDIENT_COLUMNS}"
    );

    let mut inserted = Vec::with_capacity(ingredients.len());
    for (position, ingredient) in ingredients.iter().enumerate() {
        let row = sqlx::query_as::<_, IngredientRow>(&sql)
            .bind(recipe_id)
            .bind(&ingredient.name)
            .bind(ingredient.quantity)
            .bind(&ingredient.unit)
            .bind(&ingredient.notes)
            .bind(ingredient.is_optional)
            .bind(ingredient.inventory_id)
            .bind(position as i32)
            .fetch_one(&mut *conn)
            .await?;
        inserted.push(row.into());
    }

    Ok(inserted)
}

#[async_trait]
impl RecipeRepository for PgRecipeRepository {
    async fn create(&self, user_id: i64, new_recipe: NewRecipe) -> Result<Recipe, AppError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO recipes (user_id, title, description, instructions, preparation_time, \
             servings, difficulty, image_url, categories, nutritional_info, source, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING {RECIPE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, RecipeRow>(&sql)
            .bind(user_id)
            .bind(&new_recipe.title)
            .bind(&new_recipe.description)
            .bind(&new_recipe.instructions)
            .bind(new_recipe.preparation_time)
            .bind(new_recipe.servings)
            .bind(new_recipe.difficulty.as_str())
            .bind(&new_recipe.image_url)
            .bind(Json(&new_recipe.categories))
            .bind(&new_recipe.nutritional_info)
            .bind(&new_recipe.source)
            .bind(&new_recipe.notes)
            .fetch_one(&mut *tx)
            .await?;

        let ingredients = insert_ingredients(&mut tx, row.id, &new_recipe.ingredients).await?;

        tx.commit().await?;
        row.into_recipe(ingredients)
    }

    async fn find_by_id(&self, user_id: i64, id: i64) -> Result<Option<Recipe>, AppError> {
        let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, RecipeRow>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(self.assemble(row.into_iter().collect()).await?.pop())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Recipe>, AppError> {
        let sql = format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, RecipeRow>(&sql)
            .bind(user_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        self.assemble(rows).await
    }

    async fn find_by_ids(&self, user_id: i64, ids: &[i64]) -> Result<Vec<Recipe>, AppError> {
        let sql = format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE user_id = $1 AND id = ANY($2) ORDER BY id"
        );
        let rows = sqlx::query_as::<_, RecipeRow>(&sql)
            .bind(user_id)
            .bind(ids)
            .fetch_all(self.pool.as_ref())
            .await?;

        self.assemble(rows).await
    }

    async fn update(
        &self,
        user_id: i64,
        id: i64,
        patch: RecipePatch,
    ) -> Result<Option<Recipe>, AppError> {
        let mut tx = self.pool.begin().await?;

        let select =
            format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1 AND user_id = $2 FOR UPDATE");
        let Some(row) = sqlx::query_as::<_, RecipeRow>(&select)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let mut recipe = row.into_recipe(Vec::new())?;
        patch.apply_to(&mut recipe);

        let update = format!(
            "UPDATE recipes SET title = $3, description = $4, instructions = $5, \
             preparation_time = $6, servings = $7, difficulty = $8, image_url = $9, \
             categories = $10, is_favorite = $11, nutritional_info = $12, source = $13, \
             notes = $14, updated_at = now() \
             WHERE id = $1 AND user_id = $2 RETURNING {RECIPE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, RecipeRow>(&update)
            .bind(id)
            .bind(user_id)
            .bind(&recipe.title)
            .bind(&recipe.description)
            .bind(&recipe.instructions)
            .bind(recipe.preparation_time)
            .bind(recipe.servings)
            .bind(recipe.difficulty.as_str())
            .bind(&recipe.image_url)
            .bind(Json(&recipe.categories))
            .bind(recipe.is_favorite)
            .bind(&recipe.nutritional_info)
            .bind(&recipe.source)
            .bind(&recipe.notes)
            .fetch_one(&mut *tx)
            .await?;

        let ingredients = match &patch.ingredients {
            Some(replacement) => {
                sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                insert_ingredients(&mut tx, id, replacement).await?
            }
            None => load_ingredients(&mut tx, id).await?,
        };

        tx.commit().await?;
        row.into_recipe(ingredients).map(Some)
    }

    async fn delete(&self, user_id: i64, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
