//! Authentication module
//!
//! Salted password hashing for the accounts that own image records.

pub mod accounts;

use rand::Rng;
use sha2::{Digest, Sha256};

/// Generate a random salt for password hashing
pub fn generate_salt() -> String {
    let random_bytes: [u8; 16] = rand::rng().random();
    hex::encode(random_bytes)
}

/// Hash a password with a salt
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, salt: &str, hash: &str) -> bool {
    constant_time_eq(hash_password(password, salt).as_bytes(), hash.as_bytes())
}

/// Compares all bytes regardless of where the first mismatch occurs.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
