//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Field names on the wire are camelCase.

pub mod auth;
pub mod datetime;
pub mod health;
pub mod inventory;
pub mod message;
pub mod pagination;
pub mod recipes;
pub mod shopping_list;
pub mod trimmed;
