//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with
//! runtime-checked queries. Decimal columns are cast to `float8` on read.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - User accounts
//! - [`PgInventoryRepository`] - Pantry items
//! - [`PgRecipeRepository`] - Recipes and ingredients
//! - [`PgShoppingListRepository`] - Shopping lists and items

pub mod pg_inventory_repository;
pub mod pg_recipe_repository;
pub mod pg_shopping_list_repository;
pub mod pg_user_repository;

pub use pg_inventory_repository::PgInventoryRepository;
pub use pg_recipe_repository::PgRecipeRepository;
pub use pg_shopping_list_repository::PgShoppingListRepository;
pub use pg_user_repository::PgUserRepository;
