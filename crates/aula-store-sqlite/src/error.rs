//! Error type for `aula-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Provisioning refused: credentials are immutable once created.
  #[error("admin already provisioned: {0}")]
  AdminExists(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
