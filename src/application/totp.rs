//! Time-based one-time-password verification used as the step-up gate for
//! administrative access.
//!
//! One process-wide shared secret, 30-second time step, 6-digit codes.
//! Verification tolerates one step of clock drift in either direction. There
//! is no replay store: a code stays valid until its time bucket (plus the
//! drift window) expires.

use secrecy::{ExposeSecret, SecretString};
use totp_rs::{Algorithm, Secret, TOTP};

use crate::app_error::{AppError, AppResult};

const DIGITS: usize = 6;
const SKEW: u8 = 1;
const STEP_SECONDS: u64 = 30;

pub struct TotpVerifier {
    totp: TOTP,
}

impl TotpVerifier {
    /// Builds a verifier from a base32-encoded shared secret.
    pub fn new(secret: &SecretString, issuer: &str, account: &str) -> AppResult<Self> {
        let secret_bytes = Secret::Encoded(secret.expose_secret().to_string())
            .to_bytes()
            .map_err(|e| AppError::Internal(format!("invalid TOTP secret: {e:?}")))?;

        let totp = TOTP::new(
            Algorithm::SHA1,
            DIGITS,
            SKEW,
            STEP_SECONDS,
            secret_bytes,
            Some(issuer.to_string()),
            account.to_string(),
        )
        .map_err(|e| AppError::Internal(format!("TOTP setup failed: {e}")))?;

        Ok(Self { totp })
    }

    /// The code for the current time bucket.
    pub fn generate(&self) -> AppResult<String> {
        self.totp
            .generate_current()
            .map_err(|e| AppError::Internal(format!("system clock error: {e}")))
    }

    /// True when the candidate matches the current bucket or the immediately
    /// adjacent one.
    pub fn verify(&self, candidate: &str) -> bool {
        self.totp.check_current(candidate).unwrap_or(false)
    }

    /// Seconds until the current code rotates. Advisory only.
    pub fn remaining_in_period(&self) -> AppResult<u64> {
        self.totp
            .ttl()
            .map_err(|e| AppError::Internal(format!("system clock error: {e}")))
    }

    /// The otpauth:// URI used to enroll an authenticator app.
    pub fn provisioning_uri(&self) -> String {
        self.totp.get_url()
    }

    #[cfg(test)]
    fn generate_at(&self, time: u64) -> String {
        self.totp.generate(time)
    }

    #[cfg(test)]
    fn verify_at(&self, candidate: &str, time: u64) -> bool {
        self.totp.check(candidate, time)
    }
}
