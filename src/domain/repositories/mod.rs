//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access. Implementations live in
//! `crate::infrastructure::persistence`; mock implementations are generated
//! by `mockall` for service tests.
//!
//! - [`UserRepository`] - Accounts, credentials and reset tokens
//! - [`InventoryRepository`] - Pantry items
//! - [`RecipeRepository`] - Recipes with ingredients
//! - [`ShoppingListRepository`] - Shopping lists and items
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod inventory_repository;
pub mod recipe_repository;
pub mod shopping_list_repository;
pub mod user_repository;

pub use inventory_repository::InventoryRepository;
pub use recipe_repository::RecipeRepository;
pub use shopping_list_repository::ShoppingListRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use inventory_repository::MockInventoryRepository;
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
#[cfg(test)]
pub use shopping_list_repository::MockShoppingListRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
