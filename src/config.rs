//! Store settings read from the process environment.
//!
//! | Variable                         | Default | Notes                          |
//! |----------------------------------|---------|--------------------------------|
//! | `TASKLIST_DATABASE_URL`          | none    | falls back to `DATABASE_URL`   |
//! | `TASKLIST_POOL_SIZE`             | `8`     | maximum pooled connections     |
//! | `TASKLIST_CONNECT_TIMEOUT_SECS`  | `5`     | wait for a pooled connection   |

use crate::task::adapters::postgres::TaskPgPool;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;

/// Primary database URL variable.
pub const DATABASE_URL_VAR: &str = "TASKLIST_DATABASE_URL";
/// Database URL variable consulted when [`DATABASE_URL_VAR`] is unset.
pub const FALLBACK_DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Pool size variable.
pub const POOL_SIZE_VAR: &str = "TASKLIST_POOL_SIZE";
/// Connection timeout variable, in whole seconds.
pub const CONNECT_TIMEOUT_VAR: &str = "TASKLIST_CONNECT_TIMEOUT_SECS";

const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_CONNECT_TIMEOUT_SECS: u32 = 5;

/// Errors raised while loading settings or opening the pool.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither database URL variable is set.
    #[error("{DATABASE_URL_VAR} (or {FALLBACK_DATABASE_URL_VAR}) must be set")]
    MissingDatabaseUrl,

    /// A numeric variable is not a positive integer.
    #[error("{variable} must be a positive integer, got '{value}'")]
    InvalidNumber {
        /// Offending variable name.
        variable: &'static str,
        /// Raw value found in the environment.
        value: String,
    },

    /// The connection pool could not be built.
    #[error("failed to open database pool: {0}")]
    Pool(#[source] PoolError),
}

/// Connection settings for the `PostgreSQL` task store.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreSettings {
    database_url: String,
    max_connections: NonZeroU32,
    connect_timeout: Duration,
}

impl StoreSettings {
    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the database URL is missing or a numeric
    /// variable is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads settings through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the database URL is missing or a numeric
    /// variable is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let database_url = read(DATABASE_URL_VAR)
            .or_else(|| read(FALLBACK_DATABASE_URL_VAR))
            .ok_or(ConfigError::MissingDatabaseUrl)?;
        let max_connections = positive(POOL_SIZE_VAR, read(POOL_SIZE_VAR), DEFAULT_POOL_SIZE)?;
        let timeout_secs = positive(
            CONNECT_TIMEOUT_VAR,
            read(CONNECT_TIMEOUT_VAR),
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )?;

        Ok(Self {
            database_url,
            max_connections,
            connect_timeout: Duration::from_secs(u64::from(timeout_secs.get())),
        })
    }

    /// Returns the database URL.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Returns the maximum number of pooled connections.
    #[must_use]
    pub const fn max_connections(&self) -> NonZeroU32 {
        self.max_connections
    }

    /// Returns how long to wait for a pooled connection.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

impl fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSettings")
            .field("database_url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

fn positive(
    variable: &'static str,
    raw: Option<String>,
    default: u32,
) -> Result<NonZeroU32, ConfigError> {
    let Some(value) = raw else {
        return NonZeroU32::new(default).ok_or(ConfigError::InvalidNumber {
            variable,
            value: default.to_string(),
        });
    };
    value
        .trim()
        .parse::<NonZeroU32>()
        .map_err(|_| ConfigError::InvalidNumber { variable, value })
}

/// Opens a connection pool for `settings`.
///
/// The pool connects eagerly, so an unreachable database is reported here.
///
/// # Errors
///
/// Returns [`ConfigError::Pool`] when no connection can be established.
pub fn build_pool(settings: &StoreSettings) -> Result<TaskPgPool, ConfigError> {
    let manager = ConnectionManager::<PgConnection>::new(settings.database_url());
    Pool::builder()
        .max_size(settings.max_connections().get())
        .connection_timeout(settings.connect_timeout())
        .build(manager)
        .map_err(ConfigError::Pool)
}
