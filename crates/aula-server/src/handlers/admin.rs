//! Admin-only routes.
//!
//! The portal's admin CRUD lives behind the same [`Elevated`] guard;
//! this crate carries only the session probe the handshake is tested
//! against.

use axum::{Json, response::IntoResponse};
use serde_json::json;

use crate::guard::Elevated;

/// `GET /admin/session` — who am I, if fully authenticated.
pub async fn session(Elevated(identifier): Elevated) -> impl IntoResponse {
  Json(json!({ "success": true, "identifier": identifier }))
}
