//! The mail-delivery capability consumed by the handshake.

use std::future::Future;

/// Outcome of a delivery attempt.
///
/// Modelled as an explicit outcome rather than an error so the
/// handshake's response-shaping logic switches on it directly: an
/// unconfigured dispatcher is a permanent, expected condition, not an
/// exceptional one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
  /// The dispatcher accepted the message.
  Delivered,
  /// No dispatcher is configured; delivery can never succeed.
  Unavailable,
  /// A configured dispatcher failed this particular send.
  TransientFailure,
}

impl DeliveryOutcome {
  pub fn is_delivered(self) -> bool {
    matches!(self, DeliveryOutcome::Delivered)
  }
}

/// Abstraction over message delivery.
pub trait Mailer: Send + Sync {
  /// Attempt to deliver `body` to `to`. Never fails hard — every
  /// failure mode is folded into the returned outcome.
  fn send<'a>(
    &'a self,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
  ) -> impl Future<Output = DeliveryOutcome> + Send + 'a;
}
