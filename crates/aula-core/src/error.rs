//! Error taxonomy for the admin-auth handshake.

use thiserror::Error;

/// Failures surfaced by the handshake and its collaborators.
///
/// Authentication failures deliberately carry no detail about which
/// factor failed: `InvalidCredentials` covers both unknown identifier
/// and wrong password, and `InvalidOrExpiredOtp` covers both a wrong
/// code and a timed-out one, so callers cannot be used as an
/// enumeration or timing oracle.
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("invalid credentials")]
  InvalidCredentials,

  /// Second factor submitted with no first factor on record.
  #[error("no pending login for this session")]
  NoPendingSession,

  #[error("invalid or expired passcode")]
  InvalidOrExpiredOtp,

  /// Passcode delivery failed and the insecure fallback is disabled.
  #[error("passcode delivery failed")]
  MailDeliveryFailed,

  /// The persistence layer failed its precondition check.
  #[error("persistence unavailable")]
  PersistenceUnavailable,

  #[error("{0}")]
  Validation(String),

  /// Unexpected collaborator failure. Logged server-side; never shown
  /// to clients in detail.
  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AuthError {
  /// Wrap a store error as an internal failure.
  pub fn internal<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    AuthError::Internal(Box::new(err))
  }
}

pub type Result<T, E = AuthError> = std::result::Result<T, E>;
