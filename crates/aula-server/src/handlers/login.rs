//! `POST /auth/login` — the first handshake factor.

use aula_core::{
  credential::CredentialStore, mail::Mailer, otp::OtpStore,
  session::SessionToken,
};
use axum::{
  Json,
  extract::State,
  http::HeaderMap,
  response::{IntoResponse, Response},
};
use rand_core::OsRng;
use serde::Deserialize;
use serde_json::json;

use super::require_field;
use crate::{AppState, cookie, error::Error};

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub identifier: Option<String>,
  pub password:   Option<String>,
}

/// Checks the password, issues and dispatches a passcode, and parks
/// the session in `AWAITING_OTP`. The response only ever carries the
/// code itself in degraded mode, and that mode is logged loudly.
pub async fn handler<S, M>(
  State(state): State<AppState<S, M>>,
  headers: HeaderMap,
  Json(body): Json<LoginBody>,
) -> Result<Response, Error>
where
  S: CredentialStore + OtpStore + 'static,
  M: Mailer + 'static,
{
  state.controller.check_persistence().await?;

  let identifier = require_field(body.identifier, "identifier")?;
  let password = require_field(body.password, "password")?;

  // Reuse the caller's token when it has one, otherwise mint a session.
  let token = cookie::bearer(&headers)
    .unwrap_or_else(|| SessionToken::generate(&mut OsRng));

  let ack = state
    .controller
    .begin(&token, identifier.trim(), &password)
    .await?;

  let payload = match &ack.fallback_code {
    None => json!({ "success": true, "requireOTP": true }),
    Some(code) => {
      // Operators should see this in every log review.
      tracing::warn!(
        delivery = ?ack.delivery,
        "passcode returned in response body; mail delivery is degraded"
      );
      json!({
        "success":     true,
        "requireOTP": true,
        "message": format!(
          "Mail delivery is unavailable. Your one-time passcode is {code}."
        ),
      })
    }
  };

  let response = Json(payload).into_response();
  Ok(cookie::set_session(response, &token, &state.config))
}
