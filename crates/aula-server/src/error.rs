//! HTTP error type and axum `IntoResponse` implementation.

use aula_core::AuthError;
use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Auth(#[from] AuthError),

  /// Guard rejection for admin-only routes. Deliberately uniform: it
  /// does not reveal whether a session exists at all.
  #[error("unauthorized")]
  Unauthorized,
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      Error::Auth(AuthError::InvalidCredentials) => {
        (StatusCode::UNAUTHORIZED, "invalid credentials".to_string())
      }
      Error::Auth(AuthError::NoPendingSession) => (
        StatusCode::UNAUTHORIZED,
        "no pending login for this session".to_string(),
      ),
      Error::Auth(AuthError::InvalidOrExpiredOtp) => (
        StatusCode::UNAUTHORIZED,
        "invalid or expired passcode".to_string(),
      ),
      Error::Auth(AuthError::MailDeliveryFailed) => {
        (StatusCode::BAD_GATEWAY, "passcode delivery failed".to_string())
      }
      Error::Auth(AuthError::PersistenceUnavailable) => {
        (StatusCode::SERVICE_UNAVAILABLE, "service unavailable".to_string())
      }
      Error::Auth(AuthError::Validation(msg)) => {
        (StatusCode::BAD_REQUEST, msg.clone())
      }
      Error::Auth(AuthError::Internal(e)) => {
        // Log the detail, surface nothing.
        tracing::error!(error = %e, "unexpected failure in handler");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "internal server error".to_string(),
        )
      }
      Error::Unauthorized => {
        (StatusCode::UNAUTHORIZED, "unauthorized".to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
