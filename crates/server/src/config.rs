//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DEALGROVE_DATABASE_URL` - `PostgreSQL` connection string
//! - `DEALGROVE_BASE_URL` - Public URL the site is served under
//! - `DEALGROVE_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `DEALGROVE_HOST` - Bind address (default: 127.0.0.1)
//! - `DEALGROVE_PORT` - Listen port (default: 3000)
//! - `DEALGROVE_UNLOCK_MS` - Unlock progress duration in ms (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use dealgrove_core::unlock::UnlockConfig;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

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

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Unlock flow timing
    pub unlock: UnlockConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry trace sample rate
    pub sentry_traces_sample_rate: f32,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the session secret fails validation (placeholder detection,
    /// entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = SecretString::from(required("DEALGROVE_DATABASE_URL")?);

        let host: IpAddr = optional("DEALGROVE_HOST")
            .unwrap_or_else(|| "127.0.0.1".to_owned())
            .parse()
            .map_err(|e| invalid("DEALGROVE_HOST", e))?;

        let port: u16 = optional("DEALGROVE_PORT")
            .unwrap_or_else(|| "3000".to_owned())
            .parse()
            .map_err(|e| invalid("DEALGROVE_PORT", e))?;

        let base_url = required("DEALGROVE_BASE_URL")?;
        url::Url::parse(&base_url).map_err(|e| invalid("DEALGROVE_BASE_URL", e))?;

        let session_secret = required("DEALGROVE_SESSION_SECRET")?;
        validate_secret("DEALGROVE_SESSION_SECRET", &session_secret)?;

        let unlock_ms: u64 = optional("DEALGROVE_UNLOCK_MS")
            .unwrap_or_else(|| "3000".to_owned())
            .parse()
            .map_err(|e| invalid("DEALGROVE_UNLOCK_MS", e))?;

        let sentry_sample_rate: f32 = optional("SENTRY_SAMPLE_RATE")
            .unwrap_or_else(|| "1.0".to_owned())
            .parse()
            .map_err(|e| invalid("SENTRY_SAMPLE_RATE", e))?;

        let sentry_traces_sample_rate: f32 = optional("SENTRY_TRACES_SAMPLE_RATE")
            .unwrap_or_else(|| "0.0".to_owned())
            .parse()
            .map_err(|e| invalid("SENTRY_TRACES_SAMPLE_RATE", e))?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret: SecretString::from(session_secret),
            unlock: UnlockConfig {
                duration: Duration::from_millis(unlock_ms),
                ..UnlockConfig::default()
            },
            sentry_dsn: optional("SENTRY_DSN"),
            sentry_environment: optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// The socket address to bind.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the public base URL is HTTPS (controls cookie security).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Expose the session secret for the session layer.
    #[must_use]
    pub fn session_secret_str(&self) -> &str {
        self.session_secret.expose_secret()
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn invalid(name: &str, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(name.to_owned(), err.to_string())
}

/// Validate a secret: length, placeholder patterns, and entropy.
fn validate_secret(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            name.to_owned(),
            format!("must be at least {MIN_SESSION_SECRET_LENGTH} characters"),
        ));
    }

    let lowered = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lowered.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                name.to_owned(),
                format!("looks like a placeholder (contains \"{pattern}\")"),
            ));
        }
    }

    if shannon_entropy_per_char(value) < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            name.to_owned(),
            "entropy too low; generate a random value".to_owned(),
        ));
    }

    Ok(())
}

/// Shannon entropy of the character distribution, in bits per character.
#[allow(clippy::cast_precision_loss)]
fn shannon_entropy_per_char(s: &str) -> f64 {
    let mut counts = std::collections::HashMap::new();
    let mut total = 0usize;
    for c in s.chars() {
        *counts.entry(c).or_insert(0usize) += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }

    counts
        .values()
        .map(|&count| {
            let p = count as f64 / total as f64;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_rejects_short() {
        assert!(matches!(
            validate_secret("TEST", "short"),
            Err(ConfigError::InsecureSecret(_, _))
        ));
    }

    #[test]
    fn test_secret_rejects_placeholder() {
        assert!(matches!(
            validate_secret("TEST", "changeme-changeme-changeme-changeme"),
            Err(ConfigError::InsecureSecret(_, _))
        ));
    }

    #[test]
    fn test_secret_rejects_low_entropy() {
        assert!(matches!(
            validate_secret("TEST", &"ab".repeat(20)),
            Err(ConfigError::InsecureSecret(_, _))
        ));
    }

    #[test]
    fn test_secret_accepts_random_looking_value() {
        assert!(validate_secret("TEST", "k9PqW3xZ8mNvB5tYhL2dRfGjC7sAuE4w").is_ok());
    }

    #[test]
    fn test_entropy_estimate() {
        assert!(shannon_entropy_per_char("aaaa") < 0.1);
        assert!(shannon_entropy_per_char("abcdefghijklmnop") > 3.9);
    }
}
