//! Utility functions shared by services and handlers.
//!
//! - [`jwt`] - Access token signing and verification
//! - [`password`] - Argon2 password hashing
//! - [`reset_token`] - Password reset token generation
//! - [`category_map`] - Food-data tag to pantry category mapping

pub mod category_map;
pub mod jwt;
pub mod password;
pub mod reset_token;
