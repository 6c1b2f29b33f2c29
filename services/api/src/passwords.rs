//! services/api/src/passwords.rs
//!
//! Argon2 hashing and verification, shared by the auth handlers and the
//! startup admin reconciliation. Plaintext never leaves this module's callers.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use membership_core::ports::{PortError, PortResult};

/// Hashes a plaintext password into a PHC-format string.
pub fn hash_password(plain: &str) -> PortResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| PortError::Unexpected(format!("Failed to hash password: {e}")))?;
    Ok(hash.to_string())
}

/// Checks a plaintext password against a stored PHC-format hash.
/// An unparsable hash counts as a failed match, not an error.
pub fn verify_password(plain: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
