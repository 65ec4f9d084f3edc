//! HTTP-API mail dispatcher.
//!
//! Delivers through a transactional-mail HTTP endpoint (Brevo-style
//! JSON payload). Mail is optional by design: a deployment without a
//! `[mail]` config section gets a dispatcher that reports
//! [`DeliveryOutcome::Unavailable`] on every send, and the handshake
//! decides what to do with that.

use aula_core::mail::{DeliveryOutcome, Mailer};
use serde::{Deserialize, Serialize};

/// The `[mail]` section of the server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
  /// Full URL of the send endpoint, e.g. `https://api.brevo.com/v3/smtp/email`.
  pub endpoint: String,
  pub api_key:  String,
  /// Sender address the provider is configured to accept.
  pub sender:   String,
}

#[derive(Debug, Serialize)]
struct Address {
  email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendPayload {
  sender:       Address,
  to:           Vec<Address>,
  subject:      String,
  text_content: String,
}

/// Dispatcher over an HTTP mail API, or a permanent no-op when mail is
/// not configured.
pub enum HttpMailer {
  Configured { client: reqwest::Client, config: MailConfig },
  Disabled,
}

impl HttpMailer {
  pub fn from_config(config: Option<MailConfig>) -> Self {
    match config {
      Some(config) => HttpMailer::Configured {
        client: reqwest::Client::new(),
        config,
      },
      None => HttpMailer::Disabled,
    }
  }
}

impl Mailer for HttpMailer {
  async fn send(
    &self,
    to: &str,
    subject: &str,
    body: &str,
  ) -> DeliveryOutcome {
    let (client, config) = match self {
      HttpMailer::Disabled => return DeliveryOutcome::Unavailable,
      HttpMailer::Configured { client, config } => (client, config),
    };

    let payload = SendPayload {
      sender:       Address { email: config.sender.clone() },
      to:           vec![Address { email: to.to_string() }],
      subject:      subject.to_string(),
      text_content: body.to_string(),
    };

    let result = client
      .post(&config.endpoint)
      .header("api-key", &config.api_key)
      .json(&payload)
      .send()
      .await;

    match result {
      Ok(response) if response.status().is_success() => {
        DeliveryOutcome::Delivered
      }
      Ok(response) => {
        tracing::warn!(status = %response.status(), "mail API rejected send");
        DeliveryOutcome::TransientFailure
      }
      Err(e) => {
        tracing::warn!(error = %e, "mail API unreachable");
        DeliveryOutcome::TransientFailure
      }
    }
  }
}
