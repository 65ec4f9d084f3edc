//! One-way password hashing (argon2, PHC strings).

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;

use crate::error::{AuthError, Result};

/// Hash a plaintext password with a fresh random salt.
///
/// Used at provisioning time only; the handshake itself never hashes.
pub fn hash(plaintext: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(plaintext.as_bytes(), &salt)
    .map_err(|e| AuthError::Validation(format!("cannot hash password: {e}")))?;
  Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC string.
///
/// Any failure — malformed hash included — reads as a mismatch, so
/// callers see one boolean and nothing else.
pub fn verify(plaintext: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(plaintext.as_bytes(), &parsed)
    .is_ok()
}
