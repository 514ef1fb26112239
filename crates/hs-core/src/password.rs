//! Password generation and hashing
//!
//! Passwords are stored as Argon2id PHC strings. Generated passwords come
//! from the OS random number generator.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::secret::Secret;

/// Length of generated passwords in characters
pub const GENERATED_PASSWORD_LEN: usize = 24;

/// Generate a random alphanumeric password
pub fn generate_password() -> Secret<String> {
    let password: String = rand::rngs::OsRng
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(char::from)
        .collect();
    Secret::new(password)
}

/// Hash a password into an Argon2 PHC string
pub fn hash_password(password: &Secret<String>) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.expose().as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string
///
/// Returns false for malformed hashes rather than erroring.
pub fn verify_password(password: &Secret<String>, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.expose().as_bytes(), &parsed)
        .is_ok()
}
