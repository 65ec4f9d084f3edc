//! [`MemorySessions`] — the in-process session store.
//!
//! Sessions are process-side only: a restart logs every admin out,
//! which is the intended behaviour for this deployment size.

use std::{collections::HashMap, sync::RwLock};

use aula_core::session::{SessionRecord, SessionStore, SessionToken};
use chrono::{Duration, Utc};

/// Session records behind an `RwLock`, keyed by opaque token.
///
/// Expiry is a 24-hour sliding window: every successful load slides
/// `last_seen` forward, and a record past the window behaves exactly
/// like one that never existed.
pub struct MemorySessions {
  ttl:   Duration,
  inner: RwLock<HashMap<SessionToken, SessionRecord>>,
}

impl MemorySessions {
  pub fn new(ttl: Duration) -> Self {
    MemorySessions { ttl, inner: RwLock::new(HashMap::new()) }
  }

  /// The production window: 24 hours of inactivity.
  pub fn with_default_ttl() -> Self {
    Self::new(Duration::hours(24))
  }

  /// Sweep out expired records, returning the count removed.
  ///
  /// Lazy expiry in [`SessionStore::load`] already guarantees
  /// correctness; this only bounds memory growth.
  pub fn purge_expired(&self) -> usize {
    let now = Utc::now();
    let mut map = self.inner.write().expect("session map lock poisoned");
    let before = map.len();
    map.retain(|_, record| now - record.last_seen <= self.ttl);
    before - map.len()
  }
}

impl SessionStore for MemorySessions {
  async fn load(&self, token: &SessionToken) -> Option<SessionRecord> {
    let now = Utc::now();
    let mut map = self.inner.write().expect("session map lock poisoned");
    match map.get_mut(token) {
      Some(record) if now - record.last_seen <= self.ttl => {
        record.last_seen = now;
        Some(record.clone())
      }
      Some(_) => {
        // Expired: discard, indistinguishable from absent.
        map.remove(token);
        None
      }
      None => None,
    }
  }

  async fn store(&self, token: &SessionToken, mut record: SessionRecord) {
    record.last_seen = Utc::now();
    let mut map = self.inner.write().expect("session map lock poisoned");
    map.insert(token.clone(), record);
  }

  async fn remove(&self, token: &SessionToken) {
    let mut map = self.inner.write().expect("session map lock poisoned");
    map.remove(token);
  }
}

#[cfg(test)]
mod tests {
  use rand_core::OsRng;

  use super::*;

  fn token() -> SessionToken {
    SessionToken::generate(&mut OsRng)
  }

  #[tokio::test]
  async fn load_unknown_token_is_none() {
    let sessions = MemorySessions::with_default_ttl();
    assert!(sessions.load(&token()).await.is_none());
  }

  #[tokio::test]
  async fn store_then_load_round_trips() {
    let sessions = MemorySessions::with_default_ttl();
    let t = token();

    let mut record = SessionRecord::default();
    record.pending_identifier = Some("admin@x.com".to_string());
    sessions.store(&t, record).await;

    let loaded = sessions.load(&t).await.unwrap();
    assert_eq!(loaded.pending_identifier.as_deref(), Some("admin@x.com"));
    assert!(!loaded.elevated);
  }

  #[tokio::test]
  async fn expired_record_reads_as_absent_and_is_discarded() {
    // Zero-width window: everything is expired on the next load.
    let sessions = MemorySessions::new(Duration::microseconds(-1));
    let t = token();
    sessions.store(&t, SessionRecord::default()).await;

    assert!(sessions.load(&t).await.is_none());
    // The record is gone, not just hidden.
    assert_eq!(sessions.purge_expired(), 0);
  }

  #[tokio::test]
  async fn remove_discards_the_record() {
    let sessions = MemorySessions::with_default_ttl();
    let t = token();
    sessions.store(&t, SessionRecord::default()).await;
    sessions.remove(&t).await;
    assert!(sessions.load(&t).await.is_none());
  }

  #[tokio::test]
  async fn purge_sweeps_only_expired_records() {
    let sessions = MemorySessions::new(Duration::microseconds(-1));
    sessions.store(&token(), SessionRecord::default()).await;
    sessions.store(&token(), SessionRecord::default()).await;
    assert_eq!(sessions.purge_expired(), 2);
    assert_eq!(sessions.purge_expired(), 0);
  }
}
