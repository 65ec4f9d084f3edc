//! `POST /auth/verify` — the second handshake factor.

use aula_core::{
  AuthError, credential::CredentialStore, mail::Mailer, otp::OtpStore,
};
use axum::{
  Json,
  extract::State,
  http::HeaderMap,
  response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use super::require_field;
use crate::{AppState, cookie, error::Error};

#[derive(Debug, Deserialize)]
pub struct VerifyBody {
  pub code: Option<String>,
}

/// Consumes the passcode and elevates the session. A request without
/// a session cookie is the same as one whose session never began the
/// handshake.
pub async fn handler<S, M>(
  State(state): State<AppState<S, M>>,
  headers: HeaderMap,
  Json(body): Json<VerifyBody>,
) -> Result<Response, Error>
where
  S: CredentialStore + OtpStore + 'static,
  M: Mailer + 'static,
{
  state.controller.check_persistence().await?;

  let code = require_field(body.code, "code")?;

  let token =
    cookie::bearer(&headers).ok_or(AuthError::NoPendingSession)?;
  let identifier =
    state.controller.verify(&token, code.trim()).await?;

  tracing::info!(%identifier, "admin session elevated");

  let response =
    Json(json!({ "success": true })).into_response();
  Ok(cookie::set_session(response, &token, &state.config))
}
