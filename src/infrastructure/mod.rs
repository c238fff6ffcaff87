//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence, caching and the food-data API.
//!
//! # Modules
//!
//! - [`cache`] - Caching abstractions (in-memory and Redis implementations)
//! - [`food_data`] - Open Food Facts HTTP client
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cache;
pub mod food_data;
pub mod persistence;
