//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`      - Health check: database and cache (public)
//! - `/v1/auth/*`        - Registration, login and password reset (public, rate limited)
//! - `/v1/*`             - Everything else (Bearer JWT required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on the public auth routes
//! - **Authentication** - Bearer JWT resolved to an active user
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::rate_limit::RateLimitMode;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router with every route and middleware except path normalization.
pub fn api_router(state: AppState, rate_limit: RateLimitMode) -> Router {
    let v1 = rate_limit
        .apply(api::routes::public_routes())
        .merge(api::routes::protected_routes(state.clone()));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/v1", v1)
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let router = api_router(state, RateLimitMode::from_behind_proxy(behind_proxy));
    NormalizePathLayer::trim_trailing_slash().layer(router)
}
