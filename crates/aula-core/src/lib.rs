//! Core types and trait definitions for the Aula admin-auth handshake.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends (`aula-store-sqlite`) and the HTTP layer
//! (`aula-server`) both depend on it; it depends on nothing heavier
//! than the hashing and randomness primitives.

pub mod credential;
pub mod error;
pub mod handshake;
pub mod mail;
pub mod otp;
pub mod password;
pub mod session;

pub use error::{AuthError, Result};
pub use handshake::{HandshakeConfig, HandshakeController, LoginAck};
