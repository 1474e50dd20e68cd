//! Infrastructure implementation of the `DatabaseProbe` port over sqlx.

use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::{ConnectOptions, Connection};

use crate::application::ports::DatabaseProbe;
use crate::domain::{ConnectionDescriptor, SslMode};

/// One-shot `PgConnection` probe bounded by a timeout.
pub struct SqlxProbe {
    timeout: Duration,
}

impl SqlxProbe {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

fn pg_ssl_mode(mode: SslMode) -> PgSslMode {
    match mode {
        SslMode::Disable => PgSslMode::Disable,
        SslMode::Allow => PgSslMode::Allow,
        SslMode::Prefer => PgSslMode::Prefer,
        SslMode::Require => PgSslMode::Require,
        SslMode::VerifyCa => PgSslMode::VerifyCa,
        SslMode::VerifyFull => PgSslMode::VerifyFull,
    }
}

fn connect_options(target: &ConnectionDescriptor) -> PgConnectOptions {
    let options = PgConnectOptions::new()
        .host(&target.host)
        .port(target.port)
        .username(&target.user)
        .password(&target.password)
        .database(&target.database)
        .ssl_mode(pg_ssl_mode(target.ssl_mode));
    match &target.ssl_root_cert {
        Some(cert) => options.ssl_root_cert(cert),
        None => options,
    }
}

impl DatabaseProbe for SqlxProbe {
    async fn ping(&self, target: &ConnectionDescriptor) -> Result<()> {
        let options = connect_options(target);
        let attempt = async {
            let mut conn = options.connect().await.context("connecting")?;
            let pinged = conn.ping().await.context("ping");
            // Close on both paths; a failed close only loses the goodbye message.
            if let Err(e) = conn.close().await {
                tracing::debug!(error = %e, "closing probe connection");
            }
            pinged
        };
        tokio::time::timeout(self.timeout, attempt)
            .await
            .map_err(|_| anyhow::anyhow!("timed out after {}s", self.timeout.as_secs()))?
    }
}
