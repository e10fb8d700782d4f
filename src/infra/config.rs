use std::net::SocketAddr;

use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use time::Duration;

pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
    /// Primary database; all writes and the tenant registry.
    pub database_url: String,
    /// Read-model pool; points at a replica in production, defaults to the
    /// primary URL when unset.
    pub database_reporting_url: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Shared step-up TOTP secret, base32-encoded.
    pub totp_secret: SecretString,
    pub totp_issuer: String,
    pub totp_account: String,
    /// Signs the short-lived credential issued after TOTP verification.
    pub jwt_secret: SecretString,
    pub step_up_ttl: Duration,
    /// Postgres NOTIFY channel bridged to the realtime endpoint.
    pub notify_channel: String,
    /// Whether to trust X-Forwarded-For headers. Set to true when behind a
    /// reverse proxy; only then is the forwarded address used for audit
    /// entries.
    pub trust_proxy: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", "127.0.0.1:3001".parse().unwrap());
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");

        let database_url: String = get_env("DATABASE_URL");
        let database_reporting_url: String =
            get_env_default("DATABASE_REPORTING_URL", database_url.clone());
        let db_max_connections: u32 = get_env_default("DB_MAX_CONNECTIONS", 5);
        let db_acquire_timeout_secs: u64 = get_env_default("DB_ACQUIRE_TIMEOUT_SECS", 5);

        let totp_secret: SecretString = SecretString::new(get_env::<String>("TOTP_SECRET").into());
        let totp_issuer: String = get_env_default("TOTP_ISSUER", "OpsDeck".to_string());
        let totp_account: String = get_env_default("TOTP_ACCOUNT", "administrator".to_string());

        let jwt_secret: SecretString = SecretString::new(get_env::<String>("JWT_SECRET").into());
        let step_up_ttl_secs: i64 = get_env_default("STEP_UP_TTL_SECS", 900);

        let notify_channel: String =
            get_env_default("NOTIFY_CHANNEL", "contact_submissions.insert".to_string());
        let trust_proxy: bool = get_env_default("TRUST_PROXY", false);

        Self {
            bind_addr,
            cors_origin,
            database_url,
            database_reporting_url,
            db_max_connections,
            db_acquire_timeout_secs,
            totp_secret,
            totp_issuer,
            totp_account,
            jwt_secret,
            step_up_ttl: Duration::seconds(step_up_ttl_secs),
            notify_channel,
            trust_proxy,
        }
    }
}
