//! Password hashing.
//!
//! Passwords are stored as an unsalted hex SHA-256 digest, matching the
//! existing `userinfo` data.

use sha2::{Digest, Sha256};

/// Hash a plaintext password into the stored representation.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a plaintext password against a stored hash.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    hash_password(password).eq_ignore_ascii_case(stored_hash)
}
