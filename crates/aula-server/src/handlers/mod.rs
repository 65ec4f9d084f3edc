//! JSON route handlers.

pub mod admin;
pub mod health;
pub mod login;
pub mod logout;
pub mod verify;

use aula_core::AuthError;

use crate::error::Error;

/// Reject missing or blank required fields with a 400.
fn require_field(value: Option<String>, name: &str) -> Result<String, Error> {
  match value {
    Some(v) if !v.trim().is_empty() => Ok(v),
    _ => Err(Error::Auth(AuthError::Validation(format!(
      "missing required field: {name}"
    )))),
  }
}
