//! Connection manager: the only owner of database pools.
//!
//! Constructed once at the composition root and handed to whoever needs a
//! pool. Connections are created lazily, bounded in number, recycled after
//! 20 minutes, and dropped after 10 seconds idle. Acquisition blocks up to
//! the configured timeout, after which the operation fails with a
//! resource-unavailable error instead of waiting indefinitely.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::app_error::{AppError, AppResult};
use crate::infra::config::AppConfig;

const IDLE_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_LIFETIME: Duration = Duration::from_secs(1200);

#[derive(Clone)]
pub struct ConnectionManager {
    primary: PgPool,
    reporting: PgPool,
}

impl ConnectionManager {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let primary = build_pool(&config.database_url, config)?;
        let reporting = if config.database_reporting_url == config.database_url {
            primary.clone()
        } else {
            build_pool(&config.database_reporting_url, config)?
        };
        Ok(Self { primary, reporting })
    }

    pub fn primary(&self) -> &PgPool {
        &self.primary
    }

    pub fn reporting(&self) -> &PgPool {
        &self.reporting
    }

    /// Liveness probe used by the health endpoint.
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.primary)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }
}

fn build_pool(url: &str, config: &AppConfig) -> anyhow::Result<PgPool> {
    let options: PgConnectOptions = url
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid database URL: {e}"))?;

    Ok(PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .connect_lazy_with(options))
}
