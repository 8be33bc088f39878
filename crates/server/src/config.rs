//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ACCESS_TOKEN_SECRET` - Session token signing secret (min 32 chars, high entropy)
//! - One of:
//!   - `PLANTNET_DATABASE_URL` - `MongoDB` connection string
//!   - `DATABASE_URL` - Generic fallback connection string
//!   - `DB_USER`, `DB_PASS`, `DB_HOST` - Atlas credentials and cluster host
//!
//! ## Optional
//! - `PLANTNET_DATABASE_NAME` - Database name (default: plantNet-session)
//! - `PLANTNET_HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 9000)
//! - `PLANTNET_ENV` - `production` for secure cross-site cookies (default: development)
//! - `PLANTNET_ALLOWED_ORIGINS` - Comma-separated CORS origins
//!   (default: `http://localhost:5173,http://localhost:5174`)
//! - `PLANTNET_LOG_FORMAT` - `json` or `text` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_TOKEN_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Default database name.
pub const DEFAULT_DATABASE_NAME: &str = "plantNet-session";

/// Origins of the web client's local development servers.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://localhost:5173", "http://localhost:5174"];

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Deployment environment.
///
/// Production serves a cross-site web client over HTTPS, so session cookies
/// are `Secure` and `SameSite=None`; development uses `SameSite=Strict`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Production,
    #[default]
    Development,
}

impl Environment {
    /// Anything other than `production` is development.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Document store connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `MongoDB` connection string (contains credentials)
    pub url: SecretString,
    /// Database holding the `users`, `plants`, and `Orders` collections
    pub name: String,
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Document store settings
    pub database: DatabaseConfig,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Deployment environment (controls cookie attributes)
    pub environment: Environment,
    /// Session token signing secret
    pub token_secret: SecretString,
    /// Origins allowed to make credentialed cross-origin requests
    pub allowed_origins: Vec<HeaderValue>,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 - 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 - 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database = DatabaseConfig::from_env()?;
        let host = get_env_or_default("PLANTNET_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("PLANTNET_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "9000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;
        let environment = Environment::parse(&get_env_or_default("PLANTNET_ENV", "development"));

        let token_secret = get_validated_secret("ACCESS_TOKEN_SECRET")?;
        validate_secret_length(&token_secret, "ACCESS_TOKEN_SECRET")?;

        let allowed_origins = match get_optional_env("PLANTNET_ALLOWED_ORIGINS") {
            Some(list) => parse_origins(&list, "PLANTNET_ALLOWED_ORIGINS")?,
            None => default_origins(),
        };

        let log_format = match get_optional_env("PLANTNET_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);

        Ok(Self {
            database,
            host,
            port,
            environment,
            token_secret,
            allowed_origins,
            log_format,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl DatabaseConfig {
    /// Load store settings from environment variables.
    ///
    /// Used by both the server and the CLI.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if no connection string can be
    /// found or composed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            url: get_database_url("PLANTNET_DATABASE_URL")?,
            name: get_env_or_default("PLANTNET_DATABASE_NAME", DEFAULT_DATABASE_NAME),
        })
    }
}

#[cfg(test)]
impl ServerConfig {
    /// Development settings with a fixed signing secret.
    #[allow(clippy::unwrap_used)]
    pub(crate) fn for_tests() -> Self {
        Self {
            database: DatabaseConfig {
                url: SecretString::from("mongodb://127.0.0.1:27017"),
                name: DEFAULT_DATABASE_NAME.to_string(),
            },
            host: "127.0.0.1".parse().unwrap(),
            port: 9000,
            environment: Environment::Development,
            token_secret: SecretString::from("k8#Qz1!vR4@pL7$wN2%tY9^bM3&cX6*d"),
            allowed_origins: default_origins(),
            log_format: LogFormat::Text,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get the store URL, falling back to `DATABASE_URL`, then to Atlas credentials.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    if let Ok(user) = std::env::var("DB_USER") {
        let password = get_required_env("DB_PASS")?;
        let host = get_required_env("DB_HOST")?;
        return Ok(SecretString::from(atlas_url(&user, &password, &host)));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Build an Atlas SRV connection string from credentials and cluster host.
fn atlas_url(user: &str, password: &str, host: &str) -> String {
    format!(
        "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority&appName=Cluster0",
        urlencoding::encode(user),
        urlencoding::encode(password),
        host.trim_end_matches('/')
    )
}

fn default_origins() -> Vec<HeaderValue> {
    DEFAULT_ALLOWED_ORIGINS
        .iter()
        .copied()
        .map(HeaderValue::from_static)
        .collect()
}

/// Parse a comma-separated origin list.
fn parse_origins(list: &str, var_name: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    let origins = list
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                return Err(ConfigError::InvalidEnvVar(
                    var_name.to_string(),
                    format!("origin must start with http:// or https:// (got {origin})"),
                ));
            }
            HeaderValue::from_str(origin.trim_end_matches('/'))
                .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if origins.is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "at least one origin is required".to_string(),
        ));
    }
    Ok(origins)
}

/// Validate that a signing secret meets minimum length requirements.
fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_TOKEN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_TOKEN_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
