//! Core domain entities.
//!
//! Entities are plain data structures. Creation inputs live in separate `New*`
//! structs and partial updates in `*Patch` structs whose `Option<Option<T>>`
//! fields distinguish "leave unchanged" from "clear".
//!
//! - [`User`] - Account with role and credentials
//! - [`InventoryItem`] - Pantry product with expiration date
//! - [`ProductInfo`] - Barcode lookup result
//! - [`Recipe`] / [`RecipeIngredient`] - Recipes and their ordered ingredients
//! - [`ShoppingList`] / [`ShoppingListItem`] - Shopping lists and entries

pub mod inventory_item;
pub mod product;
pub mod recipe;
pub mod shopping_list;
pub mod user;

pub use inventory_item::{DEFAULT_LOCATION, DEFAULT_UNIT, InventoryItem, InventoryItemPatch, NewInventoryItem};
pub use product::{NutritionalInfo, ProductInfo};
pub use recipe::{
    Difficulty, NewRecipe, NewRecipeIngredient, Recipe, RecipeFilter, RecipeIngredient, RecipePatch,
};
pub use shopping_list::{
    DEFAULT_LIST_NAME, ItemStatus, NewShoppingList, NewShoppingListItem, Priority, ShoppingList,
    ShoppingListItem, ShoppingListItemPatch, ShoppingListPatch,
};
pub use user::{NewUser, Role, User};
