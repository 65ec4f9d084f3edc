//! [`SqliteStore`] — the SQLite implementation of [`CredentialStore`]
//! and [`OtpStore`].

use std::path::Path;

use aula_core::{
  credential::{AdminCredential, CredentialStore},
  otp::{OtpRecord, OtpStore},
};
use chrono::{DateTime, Duration, DurationRound as _, SecondsFormat, Utc};
use rusqlite::OptionalExtension as _;

use crate::{Error, Result, schema::SCHEMA};

/// Fixed-width RFC 3339 UTC, so string order matches time order.
fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Credential and passcode store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a new admin credential.
  ///
  /// Fails with [`Error::AdminExists`] if the identifier is taken —
  /// credentials are immutable after provisioning, so there is no
  /// upsert.
  pub async fn provision_admin(
    &self,
    identifier: &str,
    password_hash: &str,
  ) -> Result<()> {
    let identifier = identifier.to_string();
    let password_hash = password_hash.to_string();
    let created_at = encode_dt(Utc::now());

    let inserted = self
      .conn
      .call({
        let identifier = identifier.clone();
        move |conn| {
          let changed = conn.execute(
            "INSERT OR IGNORE INTO admins (identifier, password_hash, created_at)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![identifier, password_hash, created_at],
          )?;
          Ok(changed > 0)
        }
      })
      .await?;

    if inserted {
      Ok(())
    } else {
      Err(Error::AdminExists(identifier))
    }
  }

  /// The current passcode record for `identifier`, expired or not.
  ///
  /// Diagnostic read — the handshake itself only goes through
  /// [`OtpStore::verify`].
  pub async fn pending_otp(
    &self,
    identifier: &str,
  ) -> Result<Option<OtpRecord>> {
    let identifier = identifier.to_string();
    let row = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(
            "SELECT identifier, code, created_at, expires_at
             FROM otp_codes WHERE identifier = ?1",
            rusqlite::params![identifier],
            |r| {
              Ok((
                r.get::<_, String>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
              ))
            },
          )
          .optional()?;
        Ok(row)
      })
      .await?;

    row
      .map(|(identifier, code, created_at, expires_at)| {
        Ok(OtpRecord {
          identifier,
          code,
          created_at: decode_dt(&created_at)?,
          expires_at: decode_dt(&expires_at)?,
        })
      })
      .transpose()
  }
}

// ─── CredentialStore ─────────────────────────────────────────────────────────

impl CredentialStore for SqliteStore {
  type Error = Error;

  async fn find_by_identifier(
    &self,
    identifier: &str,
  ) -> Result<Option<AdminCredential>> {
    let identifier = identifier.to_string();
    let row = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(
            "SELECT identifier, password_hash FROM admins WHERE identifier = ?1",
            rusqlite::params![identifier],
            |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)),
          )
          .optional()?;
        Ok(row)
      })
      .await?;

    Ok(row.map(|(identifier, password_hash)| AdminCredential {
      identifier,
      password_hash,
    }))
  }

  async fn ping(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── OtpStore ────────────────────────────────────────────────────────────────

impl OtpStore for SqliteStore {
  type Error = Error;

  async fn issue(
    &self,
    identifier: &str,
    code: &str,
    ttl: Duration,
  ) -> Result<OtpRecord> {
    // Truncate to the stored precision so the returned record equals
    // what a read-back would produce.
    let created_at = Utc::now()
      .duration_trunc(Duration::microseconds(1))
      .map_err(|e| Error::DateParse(e.to_string()))?;
    let record = OtpRecord {
      identifier: identifier.to_string(),
      code:       code.to_string(),
      created_at,
      expires_at: created_at + ttl,
    };

    let identifier = identifier.to_string();
    let code = code.to_string();
    let created = encode_dt(record.created_at);
    let expires = encode_dt(record.expires_at);

    // Delete-then-insert in one closure: the connection serialises
    // calls, so at most one live code per identifier ever exists.
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM otp_codes WHERE identifier = ?1",
          rusqlite::params![identifier],
        )?;
        conn.execute(
          "INSERT INTO otp_codes (identifier, code, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![identifier, code, created, expires],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn verify(&self, identifier: &str, code: &str) -> Result<bool> {
    let identifier = identifier.to_string();
    let code = code.to_string();
    let now = encode_dt(Utc::now());

    let matched = self
      .conn
      .call(move |conn| {
        let matched: bool = conn
          .query_row(
            "SELECT 1 FROM otp_codes
             WHERE identifier = ?1 AND code = ?2 AND expires_at > ?3",
            rusqlite::params![identifier, code, now],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        // Single-use: consume every record for the identifier. A miss
        // mutates nothing.
        if matched {
          conn.execute(
            "DELETE FROM otp_codes WHERE identifier = ?1",
            rusqlite::params![identifier],
          )?;
        }

        Ok(matched)
      })
      .await?;

    Ok(matched)
  }

  async fn purge_expired(&self) -> Result<u64> {
    let now = encode_dt(Utc::now());
    let purged = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "DELETE FROM otp_codes WHERE expires_at <= ?1",
          rusqlite::params![now],
        )?;
        Ok(changed as u64)
      })
      .await?;
    Ok(purged)
  }
}
