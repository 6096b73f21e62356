use chrono_tz::Tz;

use crate::core::{Result, ServerError};

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | DATABASE_PATH | ebedportal.db | SQLite file |
/// | HTTP_PORT | 3000 | HTTP port |
/// | ENVIRONMENT | development | development / staging / production |
/// | JWT_SECRET | dev placeholder | session token key |
/// | JWT_EXPIRATION_MINUTES | 1440 | session lifetime |
/// | ORDER_PROOF_SECRET | dev placeholder | HMAC key for order-proof codes |
/// | ORDER_PROOF_MAX_AGE_SECS | 86400 | order-proof validity |
/// | EXTERNAL_AUTH_SECRET | unset | shared secret of the external sign-in bridge |
/// | BUSINESS_TIMEZONE | Europe/Budapest | calendar-day boundaries |
/// | IMAGE_URL_ENDPOINT | "" | CDN base URL for image paths |
/// | REQUEST_TIMEOUT_MS | 30000 | per-request timeout |
/// | QUERY_TIMEOUT_MS | 5000 | per-store-call timeout |
/// | DB_MAX_CONNECTIONS | 5 | pool size |
/// | LOG_LEVEL | info | default log level |
/// | LOG_DIR | unset | daily log files when set |
///
/// Secrets must be set and non-empty outside `development`.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub jwt_secret: String,
    pub jwt_expiration_minutes: i64,
    pub order_proof_secret: String,
    pub order_proof_max_age_secs: i64,
    /// None disables `POST /api/auth/external`
    pub external_auth_secret: Option<String>,
    pub timezone: Tz,
    pub image_url_endpoint: String,
    pub request_timeout_ms: u64,
    pub query_timeout_ms: u64,
    pub db_max_connections: u32,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Default for Config {
    /// Development defaults; never suitable for production secrets
    fn default() -> Self {
        Self {
            database_path: "ebedportal.db".into(),
            http_port: 3000,
            environment: "development".into(),
            jwt_secret: "dev-JWT_SECRET-not-for-production".into(),
            jwt_expiration_minutes: 1440,
            order_proof_secret: "dev-ORDER_PROOF_SECRET-not-for-production".into(),
            order_proof_max_age_secs: 86_400,
            external_auth_secret: None,
            timezone: chrono_tz::Europe::Budapest,
            image_url_endpoint: String::new(),
            request_timeout_ms: 30_000,
            query_timeout_ms: 5_000,
            db_max_connections: 5,
            log_level: "info".into(),
            log_dir: None,
        }
    }
}

/// Parse an optional env var; unset falls back to `default`, malformed fails
fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => parse_value(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ServerError::Config(format!("{name}={raw:?} is invalid: {e}")))
}

impl Config {
    /// Require a secret env var: must be set and non-empty outside development.
    fn require_secret(name: &str, environment: &str, dev_default: &str) -> Result<String> {
        match std::env::var(name) {
            Ok(v) if !v.is_empty() => Ok(v),
            _ if environment == "development" => Ok(dev_default.to_string()),
            _ => Err(ServerError::Config(format!(
                "{name} must be set and non-empty in {environment} environment"
            ))),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let environment = std::env::var("ENVIRONMENT").unwrap_or(defaults.environment);

        let timezone = match std::env::var("BUSINESS_TIMEZONE") {
            Ok(name) => name
                .parse::<Tz>()
                .map_err(|e| ServerError::Config(format!("BUSINESS_TIMEZONE: {e}")))?,
            Err(_) => defaults.timezone,
        };

        Ok(Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or(defaults.database_path),
            http_port: env_parse("HTTP_PORT", defaults.http_port)?,
            jwt_secret: Self::require_secret("JWT_SECRET", &environment, &defaults.jwt_secret)?,
            jwt_expiration_minutes: env_parse(
                "JWT_EXPIRATION_MINUTES",
                defaults.jwt_expiration_minutes,
            )?,
            order_proof_secret: Self::require_secret(
                "ORDER_PROOF_SECRET",
                &environment,
                &defaults.order_proof_secret,
            )?,
            order_proof_max_age_secs: env_parse(
                "ORDER_PROOF_MAX_AGE_SECS",
                defaults.order_proof_max_age_secs,
            )?,
            external_auth_secret: std::env::var("EXTERNAL_AUTH_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            timezone,
            image_url_endpoint: std::env::var("IMAGE_URL_ENDPOINT")
                .unwrap_or(defaults.image_url_endpoint),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", defaults.request_timeout_ms)?,
            query_timeout_ms: env_parse("QUERY_TIMEOUT_MS", defaults.query_timeout_ms)?,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            environment,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
