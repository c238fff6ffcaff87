//! Recipe book management and pantry-based recommendations.

use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

use crate::domain::entities::{NewRecipe, NewRecipeIngredient, Recipe, RecipeFilter, RecipePatch};
use crate::domain::recommendation::{self, RecipeMatch};
use crate::domain::repositories::{InventoryRepository, RecipeRepository};
use crate::error::AppError;

fn recipe_not_found(id: i64) -> AppError {
    AppError::not_found("Receta no encontrada", json!({ "id": id }))
}

pub struct RecipeService<R: RecipeRepository, I: InventoryRepository> {
    recipes: Arc<R>,
    inventory: Arc<I>,
}

impl<R: RecipeRepository, I: InventoryRepository> RecipeService<R, I> {
    pub fn new(recipes: Arc<R>, inventory: Arc<I>) -> Self {
        Self { recipes, inventory }
    }

    pub async fn list(&self, user_id: i64, filter: &RecipeFilter) -> Result<Vec<Recipe>, AppError> {
        let recipes = self.recipes.list_by_user(user_id).await?;
        Ok(recipes.into_iter().filter(|r| filter.matches(r)).collect())
    }

    /// Distinct categories across the user's recipes, sorted.
    pub async fn categories(&self, user_id: i64) -> Result<Vec<String>, AppError> {
        let recipes = self.recipes.list_by_user(user_id).await?;
        let categories: BTreeSet<String> = recipes
            .into_iter()
            .flat_map(|r| r.categories)
            .filter(|c| !c.trim().is_empty())
            .collect();
        Ok(categories.into_iter().collect())
    }

    /// Recipes the user can mostly cook with what is in the pantry.
    pub async fn recommended(&self, user_id: i64) -> Result<Vec<RecipeMatch>, AppError> {
        let recipes = self.recipes.list_by_user(user_id).await?;
        let inventory = self.inventory.list_by_user(user_id).await?;
        Ok(recommendation::rank(recipes, &inventory))
    }

    pub async fn get(&self, user_id: i64, id: i64) -> Result<Recipe, AppError> {
        self.recipes
            .find_by_id(user_id, id)
            .await?
            .ok_or_else(|| recipe_not_found(id))
    }

    /// Rejects ingredient links to inventory items the user does not own.
    async fn check_inventory_links(
        &self,
        user_id: i64,
        ingredients: &[NewRecipeIngredient],
    ) -> Result<(), AppError> {
        let linked: BTreeSet<i64> = ingredients.iter().filter_map(|i| i.inventory_id).collect();
        if linked.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = linked.iter().copied().collect();
        let owned: BTreeSet<i64> = self
            .inventory
            .find_by_ids(user_id, &ids)
            .await?
            .into_iter()
            .map(|item| item.id)
            .collect();
        let missing: Vec<i64> = linked.difference(&owned).copied().collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::not_found(
                "Producto no encontrado",
                json!({ "inventoryItemIds": missing }),
            ))
        }
    }

    pub async fn create(&self, user_id: i64, new_recipe: NewRecipe) -> Result<Recipe, AppError> {
        self.check_inventory_links(user_id, &new_recipe.ingredients)
            .await?;
        let recipe = self.recipes.create(user_id, new_recipe).await?;
        info!(
            recipe_id = recipe.id,
            user_id,
            ingredients = recipe.ingredients.len(),
            "Recipe created"
        );
        Ok(recipe)
    }

    pub async fn update(&self, user_id: i64, id: i64, patch: RecipePatch) -> Result<Recipe, AppError> {
        if let Some(ingredients) = &patch.ingredients {
            self.check_inventory_links(user_id, ingredients).await?;
        }
        self.recipes
            .update(user_id, id, patch)
            .await?
            .ok_or_else(|| recipe_not_found(id))
    }

    pub async fn set_favorite(&self, user_id: i64, id: i64, favorite: bool) -> Result<Recipe, AppError> {
        let patch = RecipePatch {
            is_favorite: Some(favorite),
            ..Default::default()
        };
        self.update(user_id, id, patch).await
    }

    pub async fn delete(&self, user_id: i64, id: i64) -> Result<(), AppError> {
        if self.recipes.delete(user_id, id).await? {
            info!(recipe_id = id, user_id, "Recipe deleted");
            Ok(())
        } else {
            Err(recipe_not_found(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::inventory_item::sample_item;
    use crate::domain::entities::recipe::sample_recipe;
    use crate::domain::repositories::{MockInventoryRepository, MockRecipeRepository};

    fn service(
        recipes: MockRecipeRepository,
        inventory: MockInventoryRepository,
    ) -> RecipeService<MockRecipeRepository, MockInventoryRepository> {
        RecipeService::new(Arc::new(recipes), Arc::new(inventory))
    }

    fn book() -> Vec<Recipe> {
        let mut tortilla = sample_recipe(1, "Tortilla", &[("huevo", false), ("patata", false)]);
        tortilla.categories = vec!["cena".to_string(), "tapas".to_string()];
        tortilla.is_favorite = true;
        let mut ensalada = sample_recipe(2, "Ensalada", &[("lechuga", false), ("tomate", false)]);
        ensalada.categories = vec!["almuerzo".to_string(), "cena".to_string()];
        let arroz = sample_recipe(3, "Arroz con leche", &[("arroz", false), ("leche", false)]);
        vec![tortilla, ensalada, arroz]
    }

    #[tokio::test]
    async fn test_list_applies_filter() {
        let mut recipes = MockRecipeRepository::new();
        recipes.expect_list_by_user().returning(|_| Ok(book()));

        let filter = RecipeFilter {
            favorites_only: true,
            ..Default::default()
        };
        let found = service(recipes, MockInventoryRepository::new())
            .list(1, &filter)
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Tortilla");
    }

    #[tokio::test]
    async fn test_categories_are_distinct_and_sorted() {
        let mut recipes = MockRecipeRepository::new();
        recipes.expect_list_by_user().returning(|_| Ok(book()));

        let categories = service(recipes, MockInventoryRepository::new())
            .categories(1)
            .await
            .unwrap();
        assert_eq!(categories, vec!["almuerzo", "cena", "tapas"]);
    }

    #[tokio::test]
    async fn test_recommended_ranks_by_pantry_coverage() {
        let mut recipes = MockRecipeRepository::new();
        recipes.expect_list_by_user().returning(|_| Ok(book()));
        let mut inventory = MockInventoryRepository::new();
        inventory.expect_list_by_user().returning(|_| {
            Ok(vec![
                sample_item(1, "Huevo", "Huevos", "nevera"),
                sample_item(2, "Patata", "Verduras", "despensa"),
                sample_item(3, "Leche", "Lácteos", "nevera"),
            ])
        });

        let ranked = service(recipes, inventory).recommended(1).await.unwrap();

        let titles: Vec<_> = ranked.iter().map(|m| m.recipe.title.as_str()).collect();
        assert_eq!(titles, vec!["Tortilla", "Arroz con leche"]);
        assert_eq!(ranked[0].score, 1.0);
        assert_eq!(ranked[1].matched, 1);
    }

    #[tokio::test]
    async fn test_set_favorite_patches_flag() {
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_update()
            .withf(|_, id, patch| *id == 2 && patch.is_favorite == Some(false))
            .times(1)
            .returning(|_, id, patch| {
                let mut recipe = sample_recipe(id, "Ensalada", &[]);
                recipe.is_favorite = true;
                patch.apply_to(&mut recipe);
                Ok(Some(recipe))
            });

        let recipe = service(recipes, MockInventoryRepository::new())
            .set_favorite(1, 2, false)
            .await
            .unwrap();
        assert!(!recipe.is_favorite);
    }

    #[tokio::test]
    async fn test_missing_recipe_is_not_found() {
        let mut recipes = MockRecipeRepository::new();
        recipes.expect_find_by_id().returning(|_, _| Ok(None));
        recipes.expect_delete().returning(|_, _| Ok(false));
        let svc = service(recipes, MockInventoryRepository::new());

        assert!(matches!(svc.get(1, 9).await.unwrap_err(), AppError::NotFound { .. }));
        assert!(matches!(svc.delete(1, 9).await.unwrap_err(), AppError::NotFound { .. }));
    }

    fn linked_ingredient(inventory_id: i64) -> NewRecipeIngredient {
        NewRecipeIngredient {
            name: "Huevo".to_string(),
            quantity: 2.0,
            unit: "unidad".to_string(),
            notes: None,
            is_optional: false,
            inventory_id: Some(inventory_id),
        }
    }

    fn new_recipe(ingredients: Vec<NewRecipeIngredient>) -> NewRecipe {
        NewRecipe {
            title: "Tortilla".to_string(),
            description: None,
            instructions: "Batir y cuajar".to_string(),
            preparation_time: None,
            servings: None,
            difficulty: Default::default(),
            image_url: None,
            categories: Vec::new(),
            nutritional_info: None,
            source: None,
            notes: None,
            ingredients,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_foreign_inventory_link() {
        let mut inventory = MockInventoryRepository::new();
        inventory.expect_find_by_ids().returning(|_, _| Ok(Vec::new()));
        let mut recipes = MockRecipeRepository::new();
        recipes.expect_create().never();

        let err = service(recipes, inventory)
            .create(1, new_recipe(vec![linked_ingredient(40)]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_create_accepts_owned_inventory_link() {
        let mut inventory = MockInventoryRepository::new();
        inventory
            .expect_find_by_ids()
            .withf(|user_id, ids| *user_id == 1 && ids.to_vec() == vec![7])
            .returning(|_, _| Ok(vec![sample_item(7, "Huevo", "Huevos", "nevera")]));
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_create()
            .times(1)
            .returning(|_, _| Ok(sample_recipe(3, "Tortilla", &[("huevo", false)])));

        let recipe = service(recipes, inventory)
            .create(1, new_recipe(vec![linked_ingredient(7), linked_ingredient(7)]))
            .await
            .unwrap();

        assert_eq!(recipe.id, 3);
    }

    #[tokio::test]
    async fn test_update_checks_replacement_ingredients() {
        let mut inventory = MockInventoryRepository::new();
        inventory.expect_find_by_ids().returning(|_, _| Ok(Vec::new()));
        let mut recipes = MockRecipeRepository::new();
        recipes.expect_update().never();

        let patch = RecipePatch {
            ingredients: Some(vec![linked_ingredient(40)]),
            ..Default::default()
        };
        let err = service(recipes, inventory)
            .update(1, 3, patch)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
