//! Startup settings and the server configuration object built from them.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use todo_backend::domain::{OwnershipPolicy, TokenSigner};
use todo_backend::outbound::persistence::{DbPool, PoolConfig};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const POOL_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings read from `TODO_*` environment variables and CLI flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TODO")]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    #[ortho_config(default = 3000)]
    pub port: u16,
    /// PostgreSQL URL. Without it the server keeps data in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    pub pool_max_size: Option<u32>,
    /// `conceal` or `explicit`.
    pub ownership_policy: Option<String>,
}

/// Invalid values in [`ServerSettings`].
#[derive(Debug, thiserror::Error)]
pub enum ServerSettingsError {
    #[error("invalid value for TODO_OWNERSHIP_POLICY='{value}'; expected conceal|explicit")]
    OwnershipPolicy { value: String },
}

impl ServerSettings {
    /// Host and port to bind.
    pub fn bind_addr(&self) -> (String, u16) {
        let host = self
            .host
            .as_deref()
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .unwrap_or(DEFAULT_HOST);
        (host.to_owned(), self.port)
    }

    /// Configured ownership policy, `conceal` when unset.
    pub fn ownership_policy(&self) -> Result<OwnershipPolicy, ServerSettingsError> {
        match self.ownership_policy.as_deref() {
            None => Ok(OwnershipPolicy::default()),
            Some(raw) => raw
                .parse()
                .map_err(|_| ServerSettingsError::OwnershipPolicy {
                    value: raw.to_owned(),
                }),
        }
    }

    /// Pool settings when a database URL is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self
            .database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())?;
        Some(
            PoolConfig::new(url)
                .with_max_size(self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE))
                .with_connection_timeout(POOL_CONNECTION_TIMEOUT),
        )
    }
}

/// Everything [`super::create_server`] needs.
pub struct ServerConfig {
    pub(crate) bind_addr: (String, u16),
    pub(crate) signer: TokenSigner,
    pub(crate) ownership: OwnershipPolicy,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: (String, u16), signer: TokenSigner, ownership: OwnershipPolicy) -> Self {
        Self {
            bind_addr,
            signer,
            ownership,
            db_pool: None,
        }
    }

    /// Use PostgreSQL-backed repositories instead of the in-memory ones.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
