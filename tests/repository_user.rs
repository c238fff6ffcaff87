mod common;

use chrono::{Duration, Utc};
use pantry_api::AppError;
use pantry_api::domain::entities::{NewUser, Role};
use pantry_api::domain::repositories::UserRepository;
use pantry_api::infrastructure::persistence::PgUserRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn new_user(email: &str) -> NewUser {
    NewUser {
        name: "Ana".to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        role: Role::User,
    }
}

#[sqlx::test]
async fn test_create_user_defaults(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));

    let user = repo.create(new_user("ana@example.com")).await.unwrap();

    assert_eq!(user.email, "ana@example.com");
    assert_eq!(user.role, Role::User);
    assert!(user.is_active);
    assert!(user.last_login_at.is_none());
    assert!(user.preferences.is_object());
}

#[sqlx::test]
async fn test_email_is_unique_ignoring_case(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    repo.create(new_user("ana@example.com")).await.unwrap();

    let err = repo.create(new_user("Ana@Example.com")).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict { .. }));
}

#[sqlx::test]
async fn test_find_by_email_ignores_case(pool: PgPool) {
    let id = common::create_test_user(&pool, "ana@example.com").await;
    let repo = PgUserRepository::new(Arc::new(pool));

    let user = repo.find_by_email("ANA@example.com").await.unwrap().unwrap();

    assert_eq!(user.id, id);
    assert!(repo.find_by_email("nadie@example.com").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_reset_token_cleared_by_password_update(pool: PgPool) {
    let id = common::create_test_user(&pool, "ana@example.com").await;
    let repo = PgUserRepository::new(Arc::new(pool));

    repo.set_reset_token(id, "abc123", Utc::now() + Duration::hours(1))
        .await
        .unwrap();
    let user = repo.find_by_reset_token_hash("abc123").await.unwrap().unwrap();
    assert_eq!(user.id, id);
    assert!(user.reset_token_expires_at.is_some());

    repo.update_password(id, "$argon2id$new").await.unwrap();

    assert!(repo.find_by_reset_token_hash("abc123").await.unwrap().is_none());
    let user = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(user.password_hash, "$argon2id$new");
}

#[sqlx::test]
async fn test_touch_last_login(pool: PgPool) {
    let id = common::create_test_user(&pool, "ana@example.com").await;
    let repo = PgUserRepository::new(Arc::new(pool));

    repo.touch_last_login(id).await.unwrap();

    let user = repo.find_by_id(id).await.unwrap().unwrap();
    assert!(user.last_login_at.is_some());
}

#[sqlx::test]
async fn test_admin_updates_by_email(pool: PgPool) {
    common::create_test_user(&pool, "ana@example.com").await;
    let repo = PgUserRepository::new(Arc::new(pool));

    assert!(repo.set_role("ana@example.com", Role::Admin).await.unwrap());
    assert!(repo.set_active("ANA@example.com", false).await.unwrap());
    assert!(!repo.set_active("nadie@example.com", false).await.unwrap());

    let users = repo.list().await.unwrap();
    assert_eq!(users.len(), 1);
    assert!(users[0].is_admin());
    assert!(!users[0].is_active);
}
