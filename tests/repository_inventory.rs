mod common;

use chrono::{Duration, Utc};
use pantry_api::AppError;
use pantry_api::domain::entities::{InventoryItemPatch, NewInventoryItem};
use pantry_api::domain::repositories::InventoryRepository;
use pantry_api::infrastructure::persistence::PgInventoryRepository;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

fn new_item(user_id: i64, name: &str) -> NewInventoryItem {
    NewInventoryItem {
        user_id,
        name: name.to_string(),
        barcode: None,
        category: "Lácteos".to_string(),
        quantity: 2.5,
        unit: "litro".to_string(),
        expiration_date: Some(Utc::now() + Duration::days(2)),
        purchase_date: None,
        location: "nevera".to_string(),
        notes: None,
        image_url: None,
        nutritional_info: Some(json!({ "energy_kcal_100g": 64 })),
    }
}

#[sqlx::test]
async fn test_create_item(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "ana@example.com").await;
    let repo = PgInventoryRepository::new(Arc::new(pool));

    let item = repo.create(new_item(user_id, "Leche")).await.unwrap();

    assert_eq!(item.user_id, user_id);
    assert_eq!(item.name, "Leche");
    assert_eq!(item.quantity, 2.5);
    assert!(!item.is_finished);
    assert_eq!(item.nutritional_info.unwrap()["energy_kcal_100g"], 64);
}

#[sqlx::test]
async fn test_find_by_id_is_scoped_to_user(pool: PgPool) {
    let owner = common::create_test_user(&pool, "ana@example.com").await;
    let stranger = common::create_test_user(&pool, "luis@example.com").await;
    let id = common::create_test_item(&pool, owner, "Pan", 1.0, None).await;
    let repo = PgInventoryRepository::new(Arc::new(pool));

    assert!(repo.find_by_id(owner, id).await.unwrap().is_some());
    assert!(repo.find_by_id(stranger, id).await.unwrap().is_none());
}

#[sqlx::test]
async fn test_list_by_user(pool: PgPool) {
    let owner = common::create_test_user(&pool, "ana@example.com").await;
    let stranger = common::create_test_user(&pool, "luis@example.com").await;
    common::create_test_item(&pool, owner, "Pan", 1.0, None).await;
    common::create_finished_item(&pool, owner, "Café").await;
    common::create_test_item(&pool, stranger, "Sal", 1.0, None).await;
    let repo = PgInventoryRepository::new(Arc::new(pool));

    let items = repo.list_by_user(owner).await.unwrap();

    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.user_id == owner));
}

#[sqlx::test]
async fn test_find_by_ids_skips_foreign_items(pool: PgPool) {
    let owner = common::create_test_user(&pool, "ana@example.com").await;
    let stranger = common::create_test_user(&pool, "luis@example.com").await;
    let mine = common::create_test_item(&pool, owner, "Pan", 1.0, None).await;
    let theirs = common::create_test_item(&pool, stranger, "Sal", 1.0, None).await;
    let repo = PgInventoryRepository::new(Arc::new(pool));

    let items = repo.find_by_ids(owner, &[mine, theirs]).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, mine);
}

#[sqlx::test]
async fn test_update_applies_patch(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "ana@example.com").await;
    let expires = Utc::now() + Duration::days(5);
    let id = common::create_test_item(&pool, user_id, "Queso", 1.0, Some(expires)).await;
    let repo = PgInventoryRepository::new(Arc::new(pool));

    let patch = InventoryItemPatch {
        quantity: Some(0.25),
        expiration_date: Some(None),
        notes: Some(Some("curado".to_string())),
        is_finished: Some(true),
        ..Default::default()
    };
    let item = repo.update(user_id, id, patch).await.unwrap().unwrap();

    assert_eq!(item.quantity, 0.25);
    assert!(item.expiration_date.is_none());
    assert_eq!(item.notes.as_deref(), Some("curado"));
    assert!(item.is_finished);
    assert_eq!(item.name, "Queso");
}

#[sqlx::test]
async fn test_update_missing_item(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "ana@example.com").await;
    let repo = PgInventoryRepository::new(Arc::new(pool));

    let result = repo
        .update(user_id, 424242, InventoryItemPatch::default())
        .await
        .unwrap();

    assert!(result.is_none());
}

#[sqlx::test]
async fn test_delete_item(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "ana@example.com").await;
    let id = common::create_test_item(&pool, user_id, "Pan", 1.0, None).await;
    let repo = PgInventoryRepository::new(Arc::new(pool));

    assert!(repo.delete(user_id, id).await.unwrap());
    assert!(!repo.delete(user_id, id).await.unwrap());
}

#[sqlx::test]
async fn test_check_violation_is_validation_error(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "ana@example.com").await;
    let repo = PgInventoryRepository::new(Arc::new(pool));

    let err = repo.create(new_item(user_id, "")).await.unwrap_err();

    assert!(matches!(err, AppError::Validation { .. }));
}

#[sqlx::test]
async fn test_numeric_overflow_is_validation_error(pool: PgPool) {
    let user_id = common::create_test_user(&pool, "ana@example.com").await;
    let repo = PgInventoryRepository::new(Arc::new(pool));
    let mut item = new_item(user_id, "Arroz");
    item.quantity = 1.0e9;

    let err = repo.create(item).await.unwrap_err();

    assert!(matches!(err, AppError::Validation { .. }));
}
