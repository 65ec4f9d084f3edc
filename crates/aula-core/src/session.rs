//! Session records, opaque tokens, and the [`SessionStore`] trait.

use std::{fmt, future::Future};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use chrono::{DateTime, Utc};
use rand_core::RngCore;

/// Bytes of entropy behind a session token.
const TOKEN_BYTES: usize = 32;

/// An opaque, client-held session token.
///
/// 32 random bytes, URL-safe base64. The token is the only key into
/// the session store; a token the store has never seen simply resolves
/// to no session.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
  /// Mint a fresh token from a cryptographic RNG.
  pub fn generate<R: RngCore>(rng: &mut R) -> Self {
    let mut bytes = [0u8; TOKEN_BYTES];
    rng.fill_bytes(&mut bytes);
    SessionToken(B64.encode(bytes))
  }

  /// Reconstruct a token from its cookie representation.
  ///
  /// Returns `None` for values that cannot be a token we minted. A
  /// well-formed but unknown token is accepted here and rejected by
  /// the store lookup instead.
  pub fn parse(value: &str) -> Option<Self> {
    let decoded = B64.decode(value).ok()?;
    if decoded.len() != TOKEN_BYTES {
      return None;
    }
    Some(SessionToken(value.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

// Tokens are bearer secrets; keep them out of debug output.
impl fmt::Debug for SessionToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("SessionToken(..)")
  }
}

/// Per-session handshake state.
///
/// `pending_identifier` and `authenticated_identifier` are mutually
/// exclusive, and `elevated` is true only when
/// `authenticated_identifier` was reached through a verified passcode.
#[derive(Debug, Clone)]
pub struct SessionRecord {
  /// Set between the first and second handshake step.
  pub pending_identifier:       Option<String>,
  /// Set once the second step succeeds.
  pub authenticated_identifier: Option<String>,
  pub elevated:                 bool,
  /// Slid forward on every load; drives the 24-hour inactivity expiry.
  pub last_seen:                DateTime<Utc>,
}

impl Default for SessionRecord {
  fn default() -> Self {
    SessionRecord {
      pending_identifier:       None,
      authenticated_identifier: None,
      elevated:                 false,
      last_seen:                Utc::now(),
    }
  }
}

/// Abstraction over the process-side session backend.
///
/// Infallible by contract: the backend is in-process state, and an
/// expired or unknown token behaves identically to no session at all.
pub trait SessionStore: Send + Sync {
  /// Fetch the record for `token`, sliding its expiry forward.
  /// Expired records are discarded and reported as absent.
  fn load<'a>(
    &'a self,
    token: &'a SessionToken,
  ) -> impl Future<Output = Option<SessionRecord>> + Send + 'a;

  /// Insert or replace the record for `token`.
  fn store<'a>(
    &'a self,
    token: &'a SessionToken,
    record: SessionRecord,
  ) -> impl Future<Output = ()> + Send + 'a;

  /// Discard the record for `token`, if any.
  fn remove<'a>(
    &'a self,
    token: &'a SessionToken,
  ) -> impl Future<Output = ()> + Send + 'a;
}
