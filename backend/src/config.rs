use anyhow::{anyhow, bail};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Longest access token accepted by `POST /login`.
pub const MAX_ACCESS_TOKEN_LENGTH: u64 = 2048;
/// Length of a standard hyphenated UUID.
pub const MAX_UUID_LENGTH: u64 = 36;
pub const MAX_WORLD_DESCRIPTION_LENGTH: u64 = 600;
pub const MAX_WORLD_COMMENT_LENGTH: u64 = 500;
pub const MAX_REQUEST_BODY_LENGTH: usize = 16 * 1024;
/// Page size of comment listings when `page` is given without `max`.
pub const DEFAULT_COMMENT_PAGE_SIZE: u32 = 20;

/// Tokens shorter than this are rejected at startup.
pub const MIN_TOKEN_BYTES: usize = 16;
/// Ten years. Longer TTLs are rejected at startup.
pub const MAX_TOKEN_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

pub const DEFAULT_IDENTITY_PROVIDER_URL: &str = "https://mc-auth.com/api/v2/profile";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Postgres connection string. In-memory stores are used when unset.
    pub database_url: Option<String>,
    pub port: u16,
    pub identity_provider_url: String,
    pub identity_provider_timeout_seconds: u64,
    pub session_token_bytes: usize,
    pub refresh_token_bytes: usize,
    pub session_token_ttl_seconds: u64,
    pub refresh_token_ttl_seconds: u64,
    /// Accept `Authorization: Bearer <access token>` on mutation routes.
    pub legacy_bearer_auth_enabled: bool,
    pub cors_allow_origins: Vec<String>,
    pub rate_limit_ip_max_requests: u32,
    pub rate_limit_ip_window_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            port: 3000,
            identity_provider_url: DEFAULT_IDENTITY_PROVIDER_URL.to_string(),
            identity_provider_timeout_seconds: 10,
            session_token_bytes: 32,
            refresh_token_bytes: 64,
            session_token_ttl_seconds: 60 * 60,
            refresh_token_ttl_seconds: 30 * 24 * 60 * 60,
            legacy_bearer_auth_enabled: false,
            cors_allow_origins: vec!["*".to_string()],
            rate_limit_ip_max_requests: 20,
            rate_limit_ip_window_seconds: 1,
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty());

        let identity_provider_url = env::var("IDENTITY_PROVIDER_URL")
            .unwrap_or_else(|_| defaults.identity_provider_url.clone());
        url::Url::parse(&identity_provider_url)
            .map_err(|err| anyhow!("Invalid IDENTITY_PROVIDER_URL value: {}", err))?;

        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_else(|_| defaults.cors_allow_origins.clone());

        let config = Config {
            database_url,
            port: parse_env("PORT", defaults.port)?,
            identity_provider_url,
            identity_provider_timeout_seconds: parse_env(
                "IDENTITY_PROVIDER_TIMEOUT_SECONDS",
                defaults.identity_provider_timeout_seconds,
            )?,
            session_token_bytes: parse_env("SESSION_TOKEN_BYTES", defaults.session_token_bytes)?,
            refresh_token_bytes: parse_env("REFRESH_TOKEN_BYTES", defaults.refresh_token_bytes)?,
            session_token_ttl_seconds: parse_env(
                "SESSION_TOKEN_TTL_SECONDS",
                defaults.session_token_ttl_seconds,
            )?,
            refresh_token_ttl_seconds: parse_env(
                "REFRESH_TOKEN_TTL_SECONDS",
                defaults.refresh_token_ttl_seconds,
            )?,
            legacy_bearer_auth_enabled: parse_env(
                "LEGACY_BEARER_AUTH",
                defaults.legacy_bearer_auth_enabled,
            )?,
            cors_allow_origins,
            rate_limit_ip_max_requests: parse_env(
                "RATE_LIMIT_IP_MAX_REQUESTS",
                defaults.rate_limit_ip_max_requests,
            )?,
            rate_limit_ip_window_seconds: parse_env(
                "RATE_LIMIT_IP_WINDOW_SECONDS",
                defaults.rate_limit_ip_window_seconds,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.session_token_bytes < MIN_TOKEN_BYTES {
            bail!(
                "SESSION_TOKEN_BYTES must be at least {} (got {})",
                MIN_TOKEN_BYTES,
                self.session_token_bytes
            );
        }
        if self.refresh_token_bytes < MIN_TOKEN_BYTES {
            bail!(
                "REFRESH_TOKEN_BYTES must be at least {} (got {})",
                MIN_TOKEN_BYTES,
                self.refresh_token_bytes
            );
        }
        if self.session_token_ttl_seconds == 0 || self.refresh_token_ttl_seconds == 0 {
            bail!("token TTLs must be greater than zero");
        }
        for (key, ttl) in [
            ("SESSION_TOKEN_TTL_SECONDS", self.session_token_ttl_seconds),
            ("REFRESH_TOKEN_TTL_SECONDS", self.refresh_token_ttl_seconds),
        ] {
            if ttl > MAX_TOKEN_TTL_SECONDS {
                bail!(
                    "{} must be at most {} (got {})",
                    key,
                    MAX_TOKEN_TTL_SECONDS,
                    ttl
                );
            }
        }
        if self.session_token_ttl_seconds >= self.refresh_token_ttl_seconds {
            tracing::warn!(
                session_ttl = self.session_token_ttl_seconds,
                refresh_ttl = self.refresh_token_ttl_seconds,
                "session token TTL is not shorter than refresh token TTL"
            );
        }
        Ok(())
    }

    /// Clamped to `MAX_TOKEN_TTL_SECONDS` for configs that skipped `validate()`.
    pub fn session_ttl(&self) -> Duration {
        ttl_duration(self.session_token_ttl_seconds)
    }

    pub fn refresh_ttl(&self) -> Duration {
        ttl_duration(self.refresh_token_ttl_seconds)
    }

    /// Hex-encoded session tokens are twice as long as their byte length.
    pub fn max_session_token_length(&self) -> usize {
        self.session_token_bytes * 2
    }

    pub fn max_refresh_token_length(&self) -> usize {
        self.refresh_token_bytes * 2
    }
}

fn ttl_duration(seconds: u64) -> Duration {
    Duration::seconds(seconds.min(MAX_TOKEN_TTL_SECONDS) as i64)
}

fn parse_env<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|err| anyhow!("Invalid {} value '{}': {}", key, raw, err)),
        _ => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}
