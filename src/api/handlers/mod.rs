//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod health;
pub mod inventory;
pub mod recipes;
pub mod shopping_list;

pub use health::health_handler;
