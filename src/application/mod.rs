//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation and business rules, and
//! expose a small API to the HTTP handlers. They are generic over the
//! repository traits so tests can swap in `mockall` mocks.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Registration, login, JWT and password resets
//! - [`services::inventory_service::InventoryService`] - Pantry items, listing pipeline and stats
//! - [`services::product_service::ProductService`] - Cached barcode lookups
//! - [`services::recipe_service::RecipeService`] - Recipes and recommendations
//! - [`services::shopping_list_service::ShoppingListService`] - Shopping lists and generation

pub mod services;
