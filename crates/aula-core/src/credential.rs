//! Admin credentials and the [`CredentialStore`] trait.

use std::future::Future;

/// A provisioned admin credential.
///
/// Created once at provisioning time; no update path is exposed. The
/// hash is an argon2 PHC string — the plaintext password is never
/// persisted anywhere.
#[derive(Debug, Clone)]
pub struct AdminCredential {
  pub identifier:    String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Abstraction over the credential backend.
///
/// Read-only: provisioning happens out of band (CLI), and lookups are
/// the only operation the handshake needs. All methods return `Send`
/// futures so the trait can be used from multi-threaded async runtimes.
pub trait CredentialStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Look up a credential by its unique identifier.
  /// Returns `None` if no such admin is provisioned.
  fn find_by_identifier<'a>(
    &'a self,
    identifier: &'a str,
  ) -> impl Future<Output = Result<Option<AdminCredential>, Self::Error>> + Send + 'a;

  /// Persistence precondition check.
  ///
  /// Run once per request before any handshake query so an unavailable
  /// backend short-circuits uniformly instead of failing mid-flight.
  fn ping(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
