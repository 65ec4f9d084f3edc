//! Integration tests for `SqliteStore` against an in-memory database.

use aula_core::{
  credential::CredentialStore,
  otp::OtpStore,
  password,
};
use chrono::Duration;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Provisioning & credentials ──────────────────────────────────────────────

#[tokio::test]
async fn provision_and_find_admin() {
  let s = store().await;
  let hash = password::hash("hunter2").unwrap();
  s.provision_admin("admin@x.com", &hash).await.unwrap();

  let credential = s.find_by_identifier("admin@x.com").await.unwrap();
  let credential = credential.expect("admin present");
  assert_eq!(credential.identifier, "admin@x.com");
  assert!(password::verify("hunter2", &credential.password_hash));
}

#[tokio::test]
async fn provisioning_twice_is_rejected() {
  let s = store().await;
  let hash = password::hash("hunter2").unwrap();
  s.provision_admin("admin@x.com", &hash).await.unwrap();

  let again = s.provision_admin("admin@x.com", &hash).await;
  assert!(matches!(again, Err(Error::AdminExists(id)) if id == "admin@x.com"));

  // The original row is untouched.
  let credential =
    s.find_by_identifier("admin@x.com").await.unwrap().unwrap();
  assert!(password::verify("hunter2", &credential.password_hash));
}

#[tokio::test]
async fn find_missing_admin_returns_none() {
  let s = store().await;
  let result = s.find_by_identifier("ghost@x.com").await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn ping_succeeds_on_open_store() {
  let s = store().await;
  s.ping().await.unwrap();
}

// ─── Passcodes ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn issue_then_verify_consumes_the_code() {
  let s = store().await;
  s.issue("admin@x.com", "123456", Duration::minutes(10))
    .await
    .unwrap();

  assert!(s.verify("admin@x.com", "123456").await.unwrap());
  // Single-use: the same code never verifies twice.
  assert!(!s.verify("admin@x.com", "123456").await.unwrap());
}

#[tokio::test]
async fn wrong_code_fails_and_mutates_nothing() {
  let s = store().await;
  s.issue("admin@x.com", "123456", Duration::minutes(10))
    .await
    .unwrap();

  assert!(!s.verify("admin@x.com", "654321").await.unwrap());
  // The correct code is still live.
  assert!(s.verify("admin@x.com", "123456").await.unwrap());
}

#[tokio::test]
async fn verify_is_scoped_by_identifier() {
  let s = store().await;
  s.issue("a@x.com", "111111", Duration::minutes(10)).await.unwrap();
  s.issue("b@x.com", "222222", Duration::minutes(10)).await.unwrap();

  assert!(!s.verify("a@x.com", "222222").await.unwrap());
  assert!(s.verify("b@x.com", "222222").await.unwrap());
  // Consuming b's code left a's untouched.
  assert!(s.verify("a@x.com", "111111").await.unwrap());
}

#[tokio::test]
async fn reissue_invalidates_the_previous_code() {
  let s = store().await;
  s.issue("admin@x.com", "111111", Duration::minutes(10))
    .await
    .unwrap();
  s.issue("admin@x.com", "222222", Duration::minutes(10))
    .await
    .unwrap();

  assert!(!s.verify("admin@x.com", "111111").await.unwrap());
  assert!(s.verify("admin@x.com", "222222").await.unwrap());
}

#[tokio::test]
async fn expired_code_never_verifies() {
  let s = store().await;
  // Already expired at insert time.
  s.issue("admin@x.com", "123456", Duration::seconds(-1))
    .await
    .unwrap();

  assert!(!s.verify("admin@x.com", "123456").await.unwrap());
}

#[tokio::test]
async fn issue_returns_the_persisted_record() {
  let s = store().await;
  let issued = s
    .issue("admin@x.com", "123456", Duration::minutes(10))
    .await
    .unwrap();
  assert_eq!(issued.expires_at - issued.created_at, Duration::minutes(10));

  let stored = s.pending_otp("admin@x.com").await.unwrap().unwrap();
  assert_eq!(stored.code, "123456");
  assert_eq!(stored.created_at, issued.created_at);
  assert_eq!(stored.expires_at, issued.expires_at);
}

#[tokio::test]
async fn purge_removes_only_expired_records() {
  let s = store().await;
  s.issue("old@x.com", "111111", Duration::seconds(-1)).await.unwrap();
  s.issue("new@x.com", "222222", Duration::minutes(10)).await.unwrap();

  assert_eq!(s.purge_expired().await.unwrap(), 1);
  assert!(s.pending_otp("old@x.com").await.unwrap().is_none());
  assert!(s.verify("new@x.com", "222222").await.unwrap());

  // Nothing left to purge.
  assert_eq!(s.purge_expired().await.unwrap(), 0);
}
