//! Step-up credential issued after a successful TOTP verification.
//!
//! The credential is a short-lived HS256 token; route handlers read it back
//! (via cookie) to attribute audit entries to the acting administrator.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::app_error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize)]
pub struct StepUpClaims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

pub fn issue(actor: &str, secret: &secrecy::SecretString, ttl: Duration) -> AppResult<String> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let claims = StepUpClaims {
        sub: actor.to_string(),
        iat: now,
        exp: now + ttl.whole_seconds(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.to_string()))
}

pub fn verify(token: &str, secret: &secrecy::SecretString) -> AppResult<StepUpClaims> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<StepUpClaims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Internal(e.to_string()))
}
