//! `POST /auth/logout`.

use aula_core::{
  credential::CredentialStore, mail::Mailer, otp::OtpStore,
};
use axum::{
  Json,
  extract::State,
  http::HeaderMap,
  response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{AppState, cookie, error::Error};

/// Discards the session, whatever state it was in. Always succeeds:
/// logging out of nothing is indistinguishable from logging out.
pub async fn handler<S, M>(
  State(state): State<AppState<S, M>>,
  headers: HeaderMap,
) -> Result<Response, Error>
where
  S: CredentialStore + OtpStore + 'static,
  M: Mailer + 'static,
{
  if let Some(token) = cookie::bearer(&headers) {
    state.controller.logout(&token).await;
  }

  let response = Json(json!({ "success": true })).into_response();
  Ok(cookie::clear_session(response))
}
