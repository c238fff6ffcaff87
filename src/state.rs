//! Shared application state injected into every handler.

use chrono::Duration;
use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{
    AuthService, InventoryService, ProductService, RecipeService, ShoppingListService,
};
use crate::config::Config;
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::food_data::OpenFoodFactsClient;
use crate::infrastructure::persistence::{
    PgInventoryRepository, PgRecipeRepository, PgShoppingListRepository, PgUserRepository,
};
use crate::utils::jwt::JwtService;

pub type AppAuthService = AuthService<PgUserRepository>;
pub type AppProductService = ProductService<OpenFoodFactsClient>;
pub type AppInventoryService = InventoryService<PgInventoryRepository, OpenFoodFactsClient>;
pub type AppRecipeService = RecipeService<PgRecipeRepository, PgInventoryRepository>;
pub type AppShoppingListService =
    ShoppingListService<PgShoppingListRepository, PgInventoryRepository, PgRecipeRepository>;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AppAuthService>,
    pub inventory_service: Arc<AppInventoryService>,
    pub product_service: Arc<AppProductService>,
    pub recipe_service: Arc<AppRecipeService>,
    pub shopping_list_service: Arc<AppShoppingListService>,
    pub cache: Arc<dyn CacheService>,
    pub db: Arc<PgPool>,
}

impl AppState {
    /// Wires repositories and services over one connection pool.
    pub fn new(
        pool: Arc<PgPool>,
        cache: Arc<dyn CacheService>,
        food_data: OpenFoodFactsClient,
        config: &Config,
    ) -> Self {
        let users = Arc::new(PgUserRepository::new(pool.clone()));
        let inventory = Arc::new(PgInventoryRepository::new(pool.clone()));
        let recipes = Arc::new(PgRecipeRepository::new(pool.clone()));
        let lists = Arc::new(PgShoppingListRepository::new(pool.clone()));

        let auth_service = Arc::new(AuthService::new(
            users,
            JwtService::new(&config.jwt_secret, config.jwt_expires_in_seconds),
            Duration::minutes(config.password_reset_ttl_minutes),
            config.environment.is_development(),
        ));
        let product_service = Arc::new(ProductService::new(
            Arc::new(food_data),
            cache.clone(),
            std::time::Duration::from_secs(config.cache_ttl_seconds),
        ));
        let inventory_service = Arc::new(InventoryService::new(
            inventory.clone(),
            product_service.clone(),
            config.expiring_soon_days,
        ));
        let recipe_service = Arc::new(RecipeService::new(recipes.clone(), inventory.clone()));
        let shopping_list_service = Arc::new(ShoppingListService::new(
            lists,
            inventory,
            recipes,
            config.low_stock_threshold,
        ));

        Self {
            auth_service,
            inventory_service,
            product_service,
            recipe_service,
            shopping_list_service,
            cache,
            db: pool,
        }
    }
}
