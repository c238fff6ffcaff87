#![allow(dead_code)]

use axum_test::TestServer;
use chrono::{DateTime, Utc};
use pantry_api::api::middleware::rate_limit::RateLimitMode;
use pantry_api::config::{Config, Environment};
use pantry_api::infrastructure::cache::MemoryCache;
use pantry_api::infrastructure::food_data::OpenFoodFactsClient;
use pantry_api::routes::api_router;
use pantry_api::state::AppState;
use pantry_api::utils::password::hash_password;
use serde_json::{Value, json};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

pub const TEST_PASSWORD: &str = "secreto123";

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/test".to_string(),
        redis_url: None,
        listen_addr: "127.0.0.1:0".to_string(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        environment: Environment::Development,
        behind_proxy: false,
        jwt_secret: "test-signing-secret".to_string(),
        jwt_expires_in_seconds: 3600,
        password_reset_ttl_minutes: 60,
        cache_ttl_seconds: 60,
        expiring_soon_days: 3,
        low_stock_threshold: 1.0,
        // Nothing listens on the discard port, so lookups fail fast.
        food_data_base_url: "http://127.0.0.1:9/api/v0".to_string(),
        food_data_timeout_seconds: 1,
        db_max_connections: 5,
        db_connect_timeout: 5,
        db_idle_timeout: 60,
        db_max_lifetime: 300,
    }
}

pub fn create_test_state(pool: PgPool) -> AppState {
    let config = test_config();
    let food_data = OpenFoodFactsClient::new(
        &config.food_data_base_url,
        Duration::from_secs(config.food_data_timeout_seconds),
    )
    .unwrap();

    AppState::new(
        Arc::new(pool),
        Arc::new(MemoryCache::new(Duration::from_secs(config.cache_ttl_seconds))),
        food_data,
        &config,
    )
}

pub fn make_server(pool: PgPool) -> TestServer {
    let app = api_router(create_test_state(pool), RateLimitMode::Off);
    TestServer::new(app).unwrap()
}

/// Registers an account through the API and returns its bearer token.
pub async fn register(server: &TestServer, name: &str, email: &str) -> String {
    let response = server
        .post("/v1/auth/register")
        .json(&json!({ "name": name, "email": email, "password": TEST_PASSWORD }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    response.json::<Value>()["token"]
        .as_str()
        .unwrap()
        .to_string()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Inserts a user row directly and returns its id.
pub async fn create_test_user(pool: &PgPool, email: &str) -> i64 {
    let hash = hash_password(TEST_PASSWORD).unwrap();
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind("Usuario de prueba")
    .bind(email)
    .bind(hash)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_item(
    pool: &PgPool,
    user_id: i64,
    name: &str,
    quantity: f64,
    expiration_date: Option<DateTime<Utc>>,
) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO inventory (user_id, name, category, quantity, expiration_date)
         VALUES ($1, $2, 'Otros', $3::numeric, $4)
         RETURNING id",
    )
    .bind(user_id)
    .bind(name)
    .bind(quantity)
    .bind(expiration_date)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_finished_item(pool: &PgPool, user_id: i64, name: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO inventory (user_id, name, category, is_finished)
         VALUES ($1, $2, 'Otros', TRUE)
         RETURNING id",
    )
    .bind(user_id)
    .bind(name)
    .fetch_one(pool)
    .await
    .unwrap()
}
