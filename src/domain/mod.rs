//! Domain layer containing business entities and logic.
//!
//! Nothing here talks to the database or the network. Services in
//! [`crate::application::services`] combine these pieces with the repository
//! traits, whose implementations live in [`crate::infrastructure`].
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`expiration`] - Expiration status classifier
//! - [`filter`] - Inventory filter, sort and pagination pipeline
//! - [`recommendation`] - Recipe ranking by pantry coverage

pub mod entities;
pub mod expiration;
pub mod filter;
pub mod recommendation;
pub mod repositories;
