//! Background expiry sweep.
//!
//! Lazy expiry on load keeps behaviour correct on its own; this task
//! only bounds the memory and disk held by records whose tokens or
//! identifiers never come back.

use std::{sync::Arc, time::Duration};

use aula_core::otp::OtpStore;
use tokio::task::JoinHandle;

use crate::sessions::MemorySessions;

/// Sweep cadence used by the server binary.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(15 * 60);

/// Spawn a task that periodically drops expired sessions and passcodes.
pub fn spawn<O>(
  sessions: Arc<MemorySessions>,
  otps: Arc<O>,
  period: Duration,
) -> JoinHandle<()>
where
  O: OtpStore + 'static,
{
  tokio::spawn(async move {
    let mut interval = tokio::time::interval(period);
    // The first tick completes immediately; skip it.
    interval.tick().await;
    loop {
      interval.tick().await;
      let sessions_dropped = sessions.purge_expired();
      match otps.purge_expired().await {
        Ok(codes_dropped) => {
          if sessions_dropped > 0 || codes_dropped > 0 {
            tracing::debug!(
              sessions = sessions_dropped,
              passcodes = codes_dropped,
              "expiry sweep"
            );
          }
        }
        Err(e) => tracing::warn!(error = %e, "passcode sweep failed"),
      }
    }
  })
}
