//! Unauthenticated liveness probe.

use axum::{Json, response::IntoResponse};
use serde_json::json;

/// `GET /health`
pub async fn handler() -> impl IntoResponse {
  Json(json!({
    "name":    env!("CARGO_PKG_NAME"),
    "version": env!("CARGO_PKG_VERSION"),
  }))
}
