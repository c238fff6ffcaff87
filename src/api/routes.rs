//! API route configuration.
//!
//! Everything here is mounted under `/v1`. Public authentication routes are
//! rate limited; all other routes require a Bearer JWT checked by
//! [`crate::api::middleware::auth`].

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post, put},
};

use crate::api::handlers::{auth, inventory, recipes, shopping_list};
use crate::api::middleware::auth as auth_middleware;
use crate::state::AppState;

/// Unauthenticated account routes.
///
/// # Endpoints
///
/// - `POST /auth/register`
/// - `POST /auth/login`
/// - `POST /auth/forgot-password`
/// - `POST /auth/reset-password/{token}`
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/forgot-password", post(auth::forgot_password_handler))
        .route(
            "/auth/reset-password/{token}",
            post(auth::reset_password_handler),
        )
}

/// Routes that require an authenticated user.
pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/profile", get(auth::profile_handler))
        .route("/auth/change-password", post(auth::change_password_handler))
        .nest("/inventory", inventory_routes())
        .nest("/recipes", recipe_routes())
        .nest("/shopping-list", shopping_list_routes())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware::layer))
}

/// # Endpoints
///
/// - `GET    /`                  - Filtered, sorted, paginated listing
/// - `POST   /`                  - Create an item
/// - `GET    /stats`             - Counters over unfinished items
/// - `GET    /barcode/{barcode}` - Product lookup
/// - `GET    /{id}`              - Single item
/// - `PUT    /{id}`              - Partial update
/// - `DELETE /{id}`              - Delete
/// - `PATCH  /{id}/finish`       - Mark as used up
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(inventory::list_items_handler).post(inventory::create_item_handler),
        )
        .route("/stats", get(inventory::stats_handler))
        .route("/barcode/{barcode}", get(inventory::barcode_handler))
        .route(
            "/{id}",
            get(inventory::get_item_handler)
                .put(inventory::update_item_handler)
                .delete(inventory::delete_item_handler),
        )
        .route("/{id}/finish", patch(inventory::finish_item_handler))
}

fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(recipes::list_recipes_handler).post(recipes::create_recipe_handler),
        )
        .route("/categories", get(recipes::categories_handler))
        .route("/recommended", get(recipes::recommended_handler))
        .route(
            "/{id}",
            get(recipes::get_recipe_handler)
                .put(recipes::update_recipe_handler)
                .delete(recipes::delete_recipe_handler),
        )
        .route(
            "/{id}/favorite",
            post(recipes::add_favorite_handler).delete(recipes::remove_favorite_handler),
        )
}

/// Item routes without a list id act on the current list.
fn shopping_list_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(shopping_list::current_list_handler).post(shopping_list::create_list_handler),
        )
        .route("/all", get(shopping_list::all_lists_handler))
        .route(
            "/items",
            get(shopping_list::list_items_handler)
                .post(shopping_list::add_item_handler)
                .delete(shopping_list::clear_items_handler),
        )
        .route("/items/pending", get(shopping_list::pending_items_handler))
        .route(
            "/items/purchased",
            get(shopping_list::purchased_items_handler)
                .delete(shopping_list::clear_purchased_handler),
        )
        .route(
            "/items/{item_id}",
            put(shopping_list::update_item_handler).delete(shopping_list::delete_item_handler),
        )
        .route(
            "/items/{item_id}/purchased",
            put(shopping_list::set_purchased_handler),
        )
        .route(
            "/generate-from-inventory",
            post(shopping_list::generate_from_inventory_handler),
        )
        .route(
            "/generate-from-recipes",
            post(shopping_list::generate_from_recipes_handler),
        )
        .route(
            "/add-from-inventory",
            post(shopping_list::add_from_inventory_handler),
        )
        .route(
            "/{id}",
            get(shopping_list::get_list_handler)
                .put(shopping_list::update_list_handler)
                .delete(shopping_list::delete_list_handler),
        )
}
