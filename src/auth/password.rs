//! Password credential hashing
//!
//! Passwords are stored as Argon2id PHC strings with a per-record random
//! salt. The work factor makes offline brute force deliberately slow.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

use crate::error::{FinLearnError, Result};

/// Hashes a clear-text password into a PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| FinLearnError::StorageError(format!("Password hashing failed: {}", e)))
}

/// Verifies a clear-text password against a stored PHC string
///
/// An unparseable stored hash counts as a mismatch rather than an error;
/// the caller surfaces a generic credentials failure either way.
pub fn verify_password(stored_hash: &str, password: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("hunter2-but-longer").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "hunter2-but-longer"));
        assert!(!verify_password(&hash, "wrong-password"));
    }

    #[test]
    fn test_salts_are_unique() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_is_mismatch() {
        assert!(!verify_password("not-a-phc-string", "anything"));
    }
}
