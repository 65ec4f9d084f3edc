//! SQLite backend for the Aula credential and passcode stores.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Every handshake mutation
//! is a single `call` closure, so delete-then-insert sequences are
//! serialised by the connection and never interleave.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
