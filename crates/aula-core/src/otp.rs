//! One-time passcodes: record type, code generation, and the
//! [`OtpStore`] trait.

use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use rand_core::RngCore;

/// Default passcode lifetime: 10 minutes.
pub fn default_ttl() -> Duration {
  Duration::minutes(10)
}

/// Number of decimal digits in a passcode.
pub const OTP_DIGITS: usize = 6;

const OTP_MIN: u32 = 100_000;
const OTP_SPAN: u32 = 900_000; // codes are uniform over [100000, 999999]

/// A persisted one-time passcode.
///
/// At most one unexpired record exists per identifier at any instant:
/// [`OtpStore::issue`] deletes prior records before inserting.
#[derive(Debug, Clone)]
pub struct OtpRecord {
  pub identifier: String,
  pub code:       String,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

/// Generate a 6-digit passcode, uniform over [100000, 999999].
///
/// Uses rejection sampling so the modulo step introduces no bias.
pub fn generate_code<R: RngCore>(rng: &mut R) -> String {
  // Largest multiple of OTP_SPAN below 2^32.
  let zone = u32::MAX - (u32::MAX % OTP_SPAN);
  loop {
    let sample = rng.next_u32();
    if sample < zone {
      return (OTP_MIN + sample % OTP_SPAN).to_string();
    }
  }
}

/// Abstraction over the passcode backend.
pub trait OtpStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a freshly generated code for `identifier`, expiring after
  /// `ttl`, and return the stored record. Any existing records for the
  /// identifier are deleted first, so issuing invalidates every
  /// previously issued, unconsumed code.
  fn issue<'a>(
    &'a self,
    identifier: &'a str,
    code: &'a str,
    ttl: Duration,
  ) -> impl Future<Output = Result<OtpRecord, Self::Error>> + Send + 'a;

  /// Check `code` against the current record for `identifier`.
  ///
  /// Returns `true` only for a matching code whose `expires_at` is
  /// strictly in the future, and deletes all records for the
  /// identifier on success (single-use). On failure nothing changes —
  /// callers cannot tell a wrong code from an expired one.
  fn verify<'a>(
    &'a self,
    identifier: &'a str,
    code: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Remove records whose expiry has passed, returning the count.
  ///
  /// Garbage collection only: `verify` checks the timestamp
  /// explicitly, so correctness never depends on this running.
  fn purge_expired(&self)
  -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use rand_core::OsRng;

  use super::*;

  #[test]
  fn generated_codes_are_six_digits_in_range() {
    for _ in 0..500 {
      let code = generate_code(&mut OsRng);
      assert_eq!(code.len(), OTP_DIGITS, "code: {code}");
      let n: u32 = code.parse().unwrap();
      assert!((100_000..=999_999).contains(&n), "code: {code}");
    }
  }

  /// A stuck RNG must still terminate once it yields an in-zone value.
  #[test]
  fn rejection_sampling_skips_out_of_zone_values() {
    struct Seq(Vec<u32>);
    impl RngCore for Seq {
      fn next_u32(&mut self) -> u32 {
        self.0.remove(0)
      }
      fn next_u64(&mut self) -> u64 {
        u64::from(self.next_u32())
      }
      fn fill_bytes(&mut self, _: &mut [u8]) {
        unimplemented!()
      }
      fn try_fill_bytes(
        &mut self,
        _: &mut [u8],
      ) -> Result<(), rand_core::Error> {
        unimplemented!()
      }
    }

    // u32::MAX is outside the accept zone; 0 maps to the minimum code.
    let mut rng = Seq(vec![u32::MAX, 0]);
    assert_eq!(generate_code(&mut rng), "100000");
  }
}
