//! Business logic services for the application layer.

pub mod auth_service;
pub mod inventory_service;
pub mod product_service;
pub mod recipe_service;
pub mod shopping_list_service;

pub use auth_service::{AuthService, AuthSession};
pub use inventory_service::{ClassifiedItem, InventoryService, InventoryStats, ListQuery};
pub use product_service::{ProductService, validate_barcode};
pub use recipe_service::RecipeService;
pub use shopping_list_service::{ListWithItems, ShoppingListService};
