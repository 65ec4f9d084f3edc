//! The two-step admin login handshake.
//!
//! States per session: `ANONYMOUS → AWAITING_OTP → AUTHENTICATED`.
//! The controller owns no state of its own — it orchestrates the four
//! injected capabilities (credentials, passcodes, sessions, mail), so
//! tests substitute in-memory fakes for all of them.

use std::sync::Arc;

use chrono::Duration;
use rand_core::OsRng;

use crate::{
  credential::CredentialStore,
  error::{AuthError, Result},
  mail::{DeliveryOutcome, Mailer},
  otp::{self, OtpStore},
  session::{SessionStore, SessionToken},
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Behavioural knobs for the handshake.
#[derive(Debug, Clone)]
pub struct HandshakeConfig {
  /// When delivery fails, hand the passcode back to the caller instead
  /// of hard-failing. Deliberately insecure; meant for deployments
  /// without mail configured, and off by default.
  pub allow_insecure_otp_fallback: bool,
  /// Passcode lifetime.
  pub otp_ttl: Duration,
}

impl Default for HandshakeConfig {
  fn default() -> Self {
    HandshakeConfig {
      allow_insecure_otp_fallback: false,
      otp_ttl: otp::default_ttl(),
    }
  }
}

/// Acknowledgement of a successful first factor.
#[derive(Debug)]
pub struct LoginAck {
  pub delivery: DeliveryOutcome,
  /// Set only in degraded mode: the code the client must echo back,
  /// because no mail could carry it. The HTTP layer embeds this in the
  /// response message.
  pub fallback_code: Option<String>,
}

// ─── Controller ──────────────────────────────────────────────────────────────

/// Orchestrates the two-step login against injected capabilities.
pub struct HandshakeController<C, O, S, M> {
  credentials: Arc<C>,
  otps:        Arc<O>,
  sessions:    Arc<S>,
  mailer:      Arc<M>,
  config:      HandshakeConfig,
}

impl<C, O, S, M> Clone for HandshakeController<C, O, S, M> {
  fn clone(&self) -> Self {
    HandshakeController {
      credentials: Arc::clone(&self.credentials),
      otps:        Arc::clone(&self.otps),
      sessions:    Arc::clone(&self.sessions),
      mailer:      Arc::clone(&self.mailer),
      config:      self.config.clone(),
    }
  }
}

impl<C, O, S, M> HandshakeController<C, O, S, M>
where
  C: CredentialStore,
  O: OtpStore,
  S: SessionStore,
  M: Mailer,
{
  pub fn new(
    credentials: Arc<C>,
    otps: Arc<O>,
    sessions: Arc<S>,
    mailer: Arc<M>,
    config: HandshakeConfig,
  ) -> Self {
    HandshakeController { credentials, otps, sessions, mailer, config }
  }

  /// Persistence precondition check, run once per handshake request.
  pub async fn check_persistence(&self) -> Result<()> {
    self
      .credentials
      .ping()
      .await
      .map_err(|_| AuthError::PersistenceUnavailable)
  }

  /// Transition 1: `ANONYMOUS → AWAITING_OTP`.
  ///
  /// Verifies the password, issues a fresh passcode (invalidating any
  /// prior one for the identifier), attempts delivery, and records the
  /// pending identifier in the session. Which factor failed is never
  /// disclosed, and no passcode is issued on a failed first factor.
  pub async fn begin(
    &self,
    token: &SessionToken,
    identifier: &str,
    password: &str,
  ) -> Result<LoginAck> {
    let credential = self
      .credentials
      .find_by_identifier(identifier)
      .await
      .map_err(AuthError::internal)?
      .ok_or(AuthError::InvalidCredentials)?;

    if !crate::password::verify(password, &credential.password_hash) {
      return Err(AuthError::InvalidCredentials);
    }

    let code = otp::generate_code(&mut OsRng);
    self
      .otps
      .issue(identifier, &code, self.config.otp_ttl)
      .await
      .map_err(AuthError::internal)?;

    let body = format!(
      "Your one-time passcode is {code}. It expires in {} minutes.",
      self.config.otp_ttl.num_minutes()
    );
    let delivery = self
      .mailer
      .send(identifier, "Your one-time passcode", &body)
      .await;

    let fallback_code = match delivery {
      DeliveryOutcome::Delivered => None,
      _ if self.config.allow_insecure_otp_fallback => Some(code),
      // Hard-fail discipline: the session stays ANONYMOUS. The issued
      // code is unreachable and ages out on its own.
      _ => return Err(AuthError::MailDeliveryFailed),
    };

    let mut record =
      self.sessions.load(token).await.unwrap_or_default();
    record.pending_identifier = Some(identifier.to_string());
    record.authenticated_identifier = None;
    record.elevated = false;
    self.sessions.store(token, record).await;

    Ok(LoginAck { delivery, fallback_code })
  }

  /// Transition 2: `AWAITING_OTP → AUTHENTICATED`.
  ///
  /// Returns the authenticated identifier. A wrong or expired code
  /// leaves the session in `AWAITING_OTP`; there is no retry counter.
  pub async fn verify(
    &self,
    token: &SessionToken,
    code: &str,
  ) -> Result<String> {
    let Some(mut record) = self.sessions.load(token).await else {
      return Err(AuthError::NoPendingSession);
    };
    let Some(pending) = record.pending_identifier.clone() else {
      return Err(AuthError::NoPendingSession);
    };

    let matched = self
      .otps
      .verify(&pending, code)
      .await
      .map_err(AuthError::internal)?;
    if !matched {
      return Err(AuthError::InvalidOrExpiredOtp);
    }

    record.pending_identifier = None;
    record.authenticated_identifier = Some(pending.clone());
    record.elevated = true;
    self.sessions.store(token, record).await;

    Ok(pending)
  }

  /// Discard the session outright. Absent sessions are a no-op — an
  /// expired or never-seen token already behaves as `ANONYMOUS`.
  pub async fn logout(&self, token: &SessionToken) {
    self.sessions.remove(token).await;
  }

  /// The identifier of a fully elevated session, or `None`.
  ///
  /// This is the guard every admin-only operation runs: it reveals
  /// nothing about whether a non-elevated session exists.
  pub async fn elevated_identity(
    &self,
    token: &SessionToken,
  ) -> Option<String> {
    let record = self.sessions.load(token).await?;
    if !record.elevated {
      return None;
    }
    record.authenticated_identifier
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
