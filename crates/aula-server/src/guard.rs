//! The elevation guard for admin-only routes.

use aula_core::{
  credential::CredentialStore, mail::Mailer, otp::OtpStore,
};
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{AppState, cookie, error::Error};

/// Extractor marker: present in a handler means the request carries a
/// session that completed both handshake steps. Carries the
/// authenticated identifier.
///
/// Rejection is a uniform 401 for a missing cookie, an unknown or
/// expired token, and a session that is merely `AWAITING_OTP` — none
/// of those cases is distinguishable from outside.
pub struct Elevated(pub String);

impl<S, M> FromRequestParts<AppState<S, M>> for Elevated
where
  S: CredentialStore + OtpStore + 'static,
  M: Mailer + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, M>,
  ) -> Result<Self, Self::Rejection> {
    let token =
      cookie::bearer(&parts.headers).ok_or(Error::Unauthorized)?;
    match state.controller.elevated_identity(&token).await {
      Some(identifier) => Ok(Elevated(identifier)),
      None => Err(Error::Unauthorized),
    }
  }
}
