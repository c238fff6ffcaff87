mod common;

use pantry_api::domain::entities::{Difficulty, NewRecipe, NewRecipeIngredient, RecipePatch};
use pantry_api::domain::repositories::RecipeRepository;
use pantry_api::infrastructure::persistence::PgRecipeRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn ingredient(name: &str, quantity: f64) -> NewRecipeIngredient {
    NewRecipeIngredient {
        name: name.to_string(),
        quantity,
        unit: "unidad".to_string(),
        notes: None,
        is_optional: false,
        inventory_id: None,
    }
}

fn recipe(title: &str, ingredients: Vec<NewRecipeIngredient>) -> NewRecipe {
    NewRecipe {
        title: title.to_string(),
        description: None,
        instructions: "Mezclar y cocinar".to_string(),
        preparation_time: Some(20),
        servings: Some(2),
        difficulty: Difficulty::Easy,
        image_url: None,
        categories: vec!["Cena".to_string()],
        nutritional_info: None,
        source: None,
        notes: None,
        ingredients,
    }
}

#[sqlx::test]
async fn test_create_keeps_ingredient_order(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "ana@example.com").await;
    let repo = PgRecipeRepository::new(Arc::new(pool));

    let created = repo
        .create(
            user_id,
            recipe(
                "Tortilla",
                vec![ingredient("Huevo", 4.0), ingredient("Patata", 2.0), ingredient("Sal", 1.0)],
            ),
        )
        .await
        .unwrap();

    assert_eq!(created.difficulty, Difficulty::Easy);
    assert_eq!(created.categories, ["Cena"]);
    assert!(!created.is_favorite);
    let names: Vec<&str> = created.ingredients.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Huevo", "Patata", "Sal"]);
    assert!(created.ingredients.iter().all(|i| i.recipe_id == created.id));

    let found = repo.find_by_id(user_id, created.id).await.unwrap().unwrap();
    assert_eq!(found.ingredients.len(), 3);
    assert_eq!(found.ingredients[0].quantity, 4.0);
}

#[sqlx::test]
async fn test_recipes_are_scoped_to_owner(pool: PgPool) {
    let owner = common::create_test_user(&pool, "ana@example.com").await;
    let stranger = common::create_test_user(&pool, "luis@example.com").await;
    let repo = PgRecipeRepository::new(Arc::new(pool));
    let mine = repo
        .create(owner, recipe("Tortilla", vec![ingredient("Huevo", 4.0)]))
        .await
        .unwrap();
    let theirs = repo
        .create(stranger, recipe("Gazpacho", vec![ingredient("Tomate", 6.0)]))
        .await
        .unwrap();

    assert!(repo.find_by_id(stranger, mine.id).await.unwrap().is_none());
    assert!(
        repo.update(stranger, mine.id, RecipePatch::default())
            .await
            .unwrap()
            .is_none()
    );
    assert!(!repo.delete(stranger, mine.id).await.unwrap());

    let found = repo.find_by_ids(owner, &[mine.id, theirs.id]).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, mine.id);
}

#[sqlx::test]
async fn test_list_by_user_newest_first(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "ana@example.com").await;
    let repo = PgRecipeRepository::new(Arc::new(pool));
    repo.create(user_id, recipe("Primera", vec![ingredient("Pan", 1.0)]))
        .await
        .unwrap();
    repo.create(user_id, recipe("Segunda", vec![]))
        .await
        .unwrap();

    let recipes = repo.list_by_user(user_id).await.unwrap();

    let titles: Vec<&str> = recipes.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["Segunda", "Primera"]);
    assert_eq!(recipes[1].ingredients.len(), 1);
    assert!(recipes[0].ingredients.is_empty());
}

#[sqlx::test]
async fn test_update_replaces_ingredients(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "ana@example.com").await;
    let repo = PgRecipeRepository::new(Arc::new(pool));
    let created = repo
        .create(
            user_id,
            recipe("Tortilla", vec![ingredient("Huevo", 4.0), ingredient("Patata", 2.0)]),
        )
        .await
        .unwrap();

    let patch = RecipePatch {
        is_favorite: Some(true),
        preparation_time: Some(None),
        ingredients: Some(vec![ingredient("Cebolla", 1.0)]),
        ..Default::default()
    };
    let updated = repo
        .update(user_id, created.id, patch)
        .await
        .unwrap()
        .unwrap();

    assert!(updated.is_favorite);
    assert!(updated.preparation_time.is_none());
    assert_eq!(updated.title, "Tortilla");
    assert_eq!(updated.ingredients.len(), 1);
    assert_eq!(updated.ingredients[0].name, "Cebolla");
}

#[sqlx::test]
async fn test_update_without_ingredients_keeps_them(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "ana@example.com").await;
    let repo = PgRecipeRepository::new(Arc::new(pool));
    let created = repo
        .create(user_id, recipe("Tortilla", vec![ingredient("Huevo", 4.0)]))
        .await
        .unwrap();

    let patch = RecipePatch {
        title: Some("Tortilla de patatas".to_string()),
        ..Default::default()
    };
    let updated = repo
        .update(user_id, created.id, patch)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.title, "Tortilla de patatas");
    assert_eq!(updated.ingredients.len(), 1);
}

#[sqlx::test]
async fn test_delete_recipe(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "ana@example.com").await;
    let repo = PgRecipeRepository::new(Arc::new(pool));
    let created = repo
        .create(user_id, recipe("Tortilla", vec![ingredient("Huevo", 4.0)]))
        .await
        .unwrap();

    assert!(repo.delete(user_id, created.id).await.unwrap());
    assert!(repo.find_by_id(user_id, created.id).await.unwrap().is_none());
    assert!(!repo.delete(user_id, created.id).await.unwrap());
}
