//! Process configuration
//!
//! Read once at startup from the environment (after `.env` is loaded by
//! `main`). Lookups go through a closure so tests can feed a map instead
//! of mutating the real environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use thiserror::Error;

const DEV_JWT_SECRET: &str = "dev-secret-key";
const DEFAULT_JWT_EXPIRATION_SECS: i64 = 360_000;
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration: chrono::Duration,
}

#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub api_url: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub timeout: std::time::Duration,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Postgres URL; `None` selects the in-memory store
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub github: GithubConfig,
    pub log_format: LogFormat,
    /// `JWT_SECRET` was unset and the development secret is in use
    pub dev_jwt_secret: bool,
}

impl Config {
    /// Loads configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup
    ///
    /// # Example
    /// ```
    /// use devconnect_api::config::Config;
    ///
    /// let config = Config::from_lookup(|key| match key {
    ///     "JWT_SECRET" => Some("s3cret".to_string()),
    ///     _ => None,
    /// })
    /// .expect("valid config");
    ///
    /// assert_eq!(config.addr.port(), 5000);
    /// assert!(config.database.url.is_none());
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let development = get("APP_ENV").is_some_and(|env| env == "development");
        let (secret, dev_jwt_secret) = match get("JWT_SECRET") {
            Some(secret) => (secret, false),
            None if development => (DEV_JWT_SECRET.to_string(), true),
            None => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        let expiration_secs: i64 =
            parse_or("JWT_EXPIRATION_SECS", get("JWT_EXPIRATION_SECS"), DEFAULT_JWT_EXPIRATION_SECS)?;
        if expiration_secs <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRATION_SECS",
                value: expiration_secs.to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let host: IpAddr = parse_or("HOST", get("HOST"), IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let port: u16 = parse_or("PORT", get("PORT"), 5000)?;

        let timeout_secs: u64 = parse_or("GITHUB_TIMEOUT_SECS", get("GITHUB_TIMEOUT_SECS"), 10)?;

        Ok(Self {
            addr: SocketAddr::new(host, port),
            database: DatabaseConfig {
                url: get("DATABASE_URL"),
                max_connections: parse_or(
                    "DATABASE_MAX_CONNECTIONS",
                    get("DATABASE_MAX_CONNECTIONS"),
                    5,
                )?,
            },
            jwt: JwtConfig {
                secret,
                expiration: chrono::Duration::seconds(expiration_secs),
            },
            github: GithubConfig {
                api_url: get("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
                client_id: get("GITHUB_CLIENT_ID"),
                client_secret: get("GITHUB_CLIENT_SECRET"),
                timeout: std::time::Duration::from_secs(timeout_secs),
            },
            log_format: match get("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            dev_jwt_secret,
        })
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
