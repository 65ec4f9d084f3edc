//! HTTP layer for the Aula admin-auth handshake.
//!
//! Exposes an axum [`Router`] over any credential/passcode backend and
//! any mail dispatcher; the session store is always the in-process
//! [`MemorySessions`].

pub mod cookie;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod mail;
pub mod sessions;
pub mod sweep;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use aula_core::{
  HandshakeConfig, HandshakeController, credential::CredentialStore,
  mail::Mailer, otp::OtpStore,
};
use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::{mail::MailConfig, sessions::MemorySessions};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` with
/// `AULA_`-prefixed environment overrides.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// Set the `Secure` cookie attribute. Off by default so plain-HTTP
  /// deployments keep working; anything behind TLS should enable it.
  #[serde(default)]
  pub cookie_secure: bool,
  /// Hand the passcode back in the login response when mail delivery
  /// fails. Usability accommodation for mail-less environments — it
  /// weakens the second factor and defaults to off.
  #[serde(default)]
  pub allow_insecure_otp_fallback: bool,
  /// Absent means mail is not configured, which is a supported
  /// (degraded) deployment, not an error.
  #[serde(default)]
  pub mail: Option<MailConfig>,
}

// ─── Application state ───────────────────────────────────────────────────────

/// The handshake controller wired for this server: one backend serves
/// as both credential and passcode store.
pub type Controller<S, M> = HandshakeController<S, S, MemorySessions, M>;

/// Shared state threaded through all axum handlers.
pub struct AppState<S, M> {
  pub controller: Controller<S, M>,
  pub config:     Arc<ServerConfig>,
}

impl<S, M> Clone for AppState<S, M> {
  fn clone(&self) -> Self {
    AppState {
      controller: self.controller.clone(),
      config:     Arc::clone(&self.config),
    }
  }
}

impl<S, M> AppState<S, M>
where
  S: CredentialStore + OtpStore,
  M: Mailer,
{
  pub fn new(
    store: Arc<S>,
    sessions: Arc<MemorySessions>,
    mailer: Arc<M>,
    config: ServerConfig,
  ) -> Self {
    let handshake = HandshakeConfig {
      allow_insecure_otp_fallback: config.allow_insecure_otp_fallback,
      ..HandshakeConfig::default()
    };
    let controller = HandshakeController::new(
      Arc::clone(&store),
      store,
      sessions,
      mailer,
      handshake,
    );
    AppState { controller, config: Arc::new(config) }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the portal auth surface.
pub fn router<S, M>(state: AppState<S, M>) -> Router
where
  S: CredentialStore + OtpStore + 'static,
  M: Mailer + 'static,
{
  Router::new()
    .route("/health",        get(handlers::health::handler))
    .route("/auth/login",    post(handlers::login::handler::<S, M>))
    .route("/auth/verify",   post(handlers::verify::handler::<S, M>))
    .route("/auth/logout",   post(handlers::logout::handler::<S, M>))
    .route("/admin/session", get(handlers::admin::session))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────
