//! Process configuration, read once at startup from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl core::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    /// `None` selects the in-memory stores.
    pub database: Option<DatabaseConfig>,
    pub request_timeout: Duration,
    pub dummy_login: bool,
}

impl core::fmt::Debug for Config {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Config")
            .field("bind_addr", &self.bind_addr)
            .field("token_ttl", &self.token_ttl)
            .field("database", &self.database)
            .field("request_timeout", &self.request_timeout)
            .field("dummy_login", &self.dummy_login)
            .finish_non_exhaustive()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl: chrono::Duration::hours(24),
            database: None,
            request_timeout: Duration::from_secs(10),
            dummy_login: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys take the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                defaults.jwt_secret
            }
        };

        let database = match lookup("DATABASE_URL").filter(|s| !s.is_empty()) {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
                acquire_timeout: Duration::from_secs(parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 5)?),
            }),
            None => None,
        };

        let token_ttl_secs: i64 = parse_or(&lookup, "TOKEN_TTL_SECS", defaults.token_ttl.num_seconds())?;
        if token_ttl_secs <= 0 {
            anyhow::bail!("TOKEN_TTL_SECS must be positive, got {token_ttl_secs}");
        }
        let token_ttl = chrono::Duration::try_seconds(token_ttl_secs)
            .with_context(|| format!("TOKEN_TTL_SECS out of range: {token_ttl_secs}"))?;

        let request_timeout_secs: u64 = parse_or(
            &lookup,
            "REQUEST_TIMEOUT_SECS",
            defaults.request_timeout.as_secs(),
        )?;
        if request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be positive");
        }

        Ok(Self {
            bind_addr: parse_or(&lookup, "BIND_ADDR", defaults.bind_addr)?,
            jwt_secret,
            token_ttl,
            database,
            request_timeout: Duration::from_secs(request_timeout_secs),
            dummy_login: parse_or(&lookup, "DUMMY_LOGIN", defaults.dummy_login)?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        _ => Ok(default),
    }
}
