//! One-time password reset tokens.
//!
//! The raw token goes to the user; only its SHA-256 digest is stored.

use rand::RngCore;
use sha2::{Digest, Sha256};

const TOKEN_BYTES: usize = 32;

/// Generates a random token and returns `(raw, hash)`. The raw token is 64 hex chars.
pub fn generate() -> (String, String) {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    let raw = hex::encode(bytes);
    let hash = hash(&raw);
    (raw, hash)
}

/// Lowercase hex SHA-256 of `token`.
pub fn hash(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
