mod common;

use pantry_api::domain::entities::{
    NewShoppingList, NewShoppingListItem, Priority, ShoppingListItemPatch, ShoppingListPatch,
};
use pantry_api::domain::repositories::ShoppingListRepository;
use pantry_api::infrastructure::persistence::PgShoppingListRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn item(name: &str) -> NewShoppingListItem {
    NewShoppingListItem {
        name: name.to_string(),
        quantity: 1.0,
        unit: "unidad".to_string(),
        category: None,
        notes: None,
        priority: Priority::Medium,
        price: None,
        inventory_id: None,
        recipe_id: None,
    }
}

fn list(name: &str) -> NewShoppingList {
    NewShoppingList {
        name: name.to_string(),
        ..Default::default()
    }
}

#[sqlx::test]
async fn test_find_current_prefers_newest_active(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "ana@example.com").await;
    let repo = PgShoppingListRepository::new(Arc::new(pool));

    assert!(repo.find_current(user_id).await.unwrap().is_none());

    let older = repo.create_list(user_id, list("Semana")).await.unwrap();
    let newer = repo.create_list(user_id, list("Fiesta")).await.unwrap();
    assert_eq!(repo.find_current(user_id).await.unwrap().unwrap().id, newer.id);

    let archived = ShoppingListPatch {
        is_active: Some(false),
        ..Default::default()
    };
    repo.update_list(user_id, newer.id, archived).await.unwrap();
    assert_eq!(repo.find_current(user_id).await.unwrap().unwrap().id, older.id);
}

#[sqlx::test]
async fn test_add_items_keeps_order(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "ana@example.com").await;
    let repo = PgShoppingListRepository::new(Arc::new(pool));
    let list = repo.create_list(user_id, list("Semana")).await.unwrap();

    repo.add_items(list.id, vec![item("Pan"), item("Leche")])
        .await
        .unwrap();
    repo.add_items(list.id, vec![item("Huevos")]).await.unwrap();

    let items = repo.list_items(list.id).await.unwrap();
    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Pan", "Leche", "Huevos"]);
    assert!(items.iter().all(|i| i.shopping_list_id == list.id));
}

#[sqlx::test]
async fn test_item_updates_are_scoped_to_owner(pool: PgPool) {
    let owner = common::create_test_user(&pool, "ana@example.com").await;
    let stranger = common::create_test_user(&pool, "luis@example.com").await;
    let repo = PgShoppingListRepository::new(Arc::new(pool));
    let list = repo.create_list(owner, list("Semana")).await.unwrap();
    let added = repo.add_items(list.id, vec![item("Pan")]).await.unwrap();
    let item_id = added[0].id;

    let purchased = ShoppingListItemPatch {
        is_purchased: Some(true),
        ..Default::default()
    };
    assert!(
        repo.update_item(stranger, item_id, purchased.clone())
            .await
            .unwrap()
            .is_none()
    );
    let updated = repo
        .update_item(owner, item_id, purchased)
        .await
        .unwrap()
        .unwrap();
    assert!(updated.is_purchased);

    assert!(!repo.delete_item(stranger, item_id).await.unwrap());
    assert!(repo.delete_item(owner, item_id).await.unwrap());
}

#[sqlx::test]
async fn test_clear_items(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "ana@example.com").await;
    let repo = PgShoppingListRepository::new(Arc::new(pool));
    let list = repo.create_list(user_id, list("Semana")).await.unwrap();
    let added = repo
        .add_items(list.id, vec![item("Pan"), item("Leche"), item("Sal")])
        .await
        .unwrap();

    let purchased = ShoppingListItemPatch {
        is_purchased: Some(true),
        ..Default::default()
    };
    repo.update_item(user_id, added[0].id, purchased)
        .await
        .unwrap();

    assert_eq!(repo.clear_items(list.id, true).await.unwrap(), 1);
    assert_eq!(repo.clear_items(list.id, false).await.unwrap(), 2);
    assert!(repo.list_items(list.id).await.unwrap().is_empty());
}

#[sqlx::test]
async fn test_delete_list_cascades_items(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "ana@example.com").await;
    let repo = PgShoppingListRepository::new(Arc::new(pool));
    let list = repo.create_list(user_id, list("Semana")).await.unwrap();
    repo.add_items(list.id, vec![item("Pan")]).await.unwrap();

    assert!(repo.delete_list(user_id, list.id).await.unwrap());
    assert!(repo.list_items(list.id).await.unwrap().is_empty());
    assert!(!repo.delete_list(user_id, list.id).await.unwrap());
}
