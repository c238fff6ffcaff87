//! Repository trait for recipes and their ingredients.

use async_trait::async_trait;

use crate::domain::entities::{NewRecipe, Recipe, RecipePatch};
use crate::error::AppError;

/// Repository interface for recipes.
///
/// A recipe and its ingredient list are always read and written together.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Inserts the recipe and its ingredients in one transaction.
    async fn create(&self, user_id: i64, new_recipe: NewRecipe) -> Result<Recipe, AppError>;

    async fn find_by_id(&self, user_id: i64, id: i64) -> Result<Option<Recipe>, AppError>;

    /// All recipes of a user, newest first.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Recipe>, AppError>;

    async fn find_by_ids(&self, user_id: i64, ids: &[i64]) -> Result<Vec<Recipe>, AppError>;

    /// Applies `patch`; a supplied ingredient list replaces the stored one in the same transaction.
    async fn update(
        &self,
        user_id: i64,
        id: i64,
        patch: RecipePatch,
    ) -> Result<Option<Recipe>, AppError>;

    /// Ingredients are removed by the cascade.
    async fn delete(&self, user_id: i64, id: i64) -> Result<bool, AppError>;
}
