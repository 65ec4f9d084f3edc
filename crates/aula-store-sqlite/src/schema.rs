//! SQL schema for the Aula SQLite store.
//!
//! Executed once at connection startup. Timestamps are stored as
//! fixed-width RFC 3339 UTC strings (microsecond precision), so
//! lexicographic comparison in SQL is chronological comparison.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Provisioned once via the CLI; never updated.
CREATE TABLE IF NOT EXISTS admins (
    identifier     TEXT PRIMARY KEY,
    password_hash  TEXT NOT NULL,   -- argon2 PHC string
    created_at     TEXT NOT NULL
);

-- At most one live row per identifier: issuing deletes before insert,
-- and verification deletes on success.
CREATE TABLE IF NOT EXISTS otp_codes (
    identifier  TEXT NOT NULL,
    code        TEXT NOT NULL,      -- 6 decimal digits
    created_at  TEXT NOT NULL,
    expires_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS otp_identifier_idx ON otp_codes(identifier);
CREATE INDEX IF NOT EXISTS otp_expiry_idx     ON otp_codes(expires_at);

PRAGMA user_version = 1;
";
