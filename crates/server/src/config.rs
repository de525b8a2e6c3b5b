//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `RETAILRADAR_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to plain `DATABASE_URL`)
//! - `RETAILRADAR_JWT_SECRET` - Token signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `RETAILRADAR_HOST` - Bind address (default: 127.0.0.1)
//! - `RETAILRADAR_PORT` - Listen port (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry tracing sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

/// Signing secrets shorter than this are rejected outright.
const MIN_SECRET_LEN: usize = 32;

/// Minimum Shannon entropy (bits per character) for the signing secret.
/// A random alphanumeric string sits around 5.5; prose around 4.
const MIN_SECRET_ENTROPY: f64 = 3.0;

/// Substrings that mark a secret as a placeholder someone forgot to replace.
const PLACEHOLDER_MARKERS: &[&str] = &[
    "changeme",
    "change-me",
    "your-",
    "placeholder",
    "example",
    "secret",
    "password",
    "dummy",
    "insert",
    "todo",
    "fixme",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {var}")]
    Missing { var: &'static str },
    #[error("environment variable {var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
    #[error("refusing weak secret in {var}: {reason}")]
    WeakSecret { var: &'static str, reason: String },
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` connection URL. Wrapped because it carries the database
    /// password.
    pub database_url: SecretString,
    /// Address the listener binds to.
    pub host: IpAddr,
    /// Port the listener binds to.
    pub port: u16,
    /// Secret used to sign and verify bearer tokens.
    pub jwt_secret: SecretString,
    /// Sentry DSN; error tracking is disabled when unset.
    pub sentry_dsn: Option<String>,
    /// Sentry environment name.
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate.
    pub sentry_sample_rate: f32,
    /// Sentry tracing sample rate.
    pub sentry_traces_sample_rate: f32,
}

impl ServerConfig {
    /// Load configuration from the environment, reading `.env` first if one
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required variable is missing, a value
    /// does not parse, or the signing secret looks like a placeholder or has
    /// too little entropy.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = SecretString::from(
            // Managed Postgres attach scripts export the generic name.
            var("RETAILRADAR_DATABASE_URL")
                .or_else(|| var("DATABASE_URL"))
                .ok_or(ConfigError::Missing {
                    var: "RETAILRADAR_DATABASE_URL",
                })?,
        );

        let jwt_secret = var("RETAILRADAR_JWT_SECRET").ok_or(ConfigError::Missing {
            var: "RETAILRADAR_JWT_SECRET",
        })?;
        check_secret_strength("RETAILRADAR_JWT_SECRET", &jwt_secret)?;

        Ok(Self {
            database_url,
            host: parsed_var("RETAILRADAR_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: parsed_var("RETAILRADAR_PORT", 3000)?,
            jwt_secret: SecretString::from(jwt_secret),
            sentry_dsn: var("SENTRY_DSN"),
            sentry_environment: var("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: lenient_var("SENTRY_SAMPLE_RATE", 1.0),
            sentry_traces_sample_rate: lenient_var("SENTRY_TRACES_SAMPLE_RATE", 1.0),
        })
    }

    /// The socket address the server binds to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Read an environment variable, treating absence as `None`.
fn var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Read and parse an environment variable, erroring on malformed values.
fn parsed_var<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(key) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// Read and parse an environment variable, falling back to the default on
/// malformed values. Used for telemetry tuning knobs that must never keep
/// the server from starting.
fn lenient_var<T: FromStr>(key: &str, default: T) -> T {
    var(key).and_then(|raw| raw.parse().ok()).unwrap_or(default)
}

/// Reject signing secrets that are short, look like placeholders, or have
/// low entropy. Applies to the JWT secret only; connection URLs have
/// structure that would trip these checks.
fn check_secret_strength(key: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.len() < MIN_SECRET_LEN {
        return Err(ConfigError::WeakSecret {
            var: key,
            reason: format!("shorter than {MIN_SECRET_LEN} characters"),
        });
    }

    let lower = value.to_lowercase();
    if let Some(marker) = PLACEHOLDER_MARKERS.iter().copied().find(|m| lower.contains(m)) {
        return Err(ConfigError::WeakSecret {
            var: key,
            reason: format!("looks like a placeholder (contains \"{marker}\")"),
        });
    }

    let entropy = shannon_entropy(value);
    if entropy < MIN_SECRET_ENTROPY {
        return Err(ConfigError::WeakSecret {
            var: key,
            reason: format!(
                "entropy {entropy:.2} bits/char is below {MIN_SECRET_ENTROPY:.1}; generate a random secret"
            ),
        });
    }

    Ok(())
}

/// Shannon entropy of a string in bits per character, computed over bytes.
#[allow(clippy::cast_precision_loss)] // secrets are far below 2^52 bytes
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut bytes: Vec<u8> = s.bytes().collect();
    bytes.sort_unstable();

    let total = bytes.len() as f64;
    bytes
        .chunk_by(|a, b| a == b)
        .map(|run| {
            let p = run.len() as f64 / total;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_of_empty_and_uniform_strings_is_zero() {
        assert!(shannon_entropy("").abs() < f64::EPSILON);
        assert!(shannon_entropy("zzzzzzzz").abs() < f64::EPSILON);
    }

    #[test]
    fn test_entropy_of_two_symbol_string() {
        // Half 'a', half 'b' is exactly 1 bit per character.
        assert!((shannon_entropy("abababab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_random_secret_clears_the_entropy_bar() {
        assert!(shannon_entropy("kY8#mW2$qR5@tZ9!vN4%") > MIN_SECRET_ENTROPY);
    }

    #[test]
    fn test_short_secret_rejected() {
        let err = check_secret_strength("TEST_SECRET", "too-short").unwrap_err();
        assert!(matches!(err, ConfigError::WeakSecret { .. }));
    }

    #[test]
    fn test_placeholder_secret_rejected() {
        for value in [
            "changeme-changeme-changeme-changeme",
            "your-jwt-signing-key-goes-right-here",
        ] {
            assert!(check_secret_strength("TEST_SECRET", value).is_err());
        }
    }

    #[test]
    fn test_repetitive_secret_rejected_for_entropy() {
        let err = check_secret_strength("TEST_SECRET", &"ab".repeat(20)).unwrap_err();
        let ConfigError::WeakSecret { reason, .. } = err else {
            panic!("expected WeakSecret, got {err}");
        };
        assert!(reason.contains("entropy"));
    }

    #[test]
    fn test_strong_secret_accepted() {
        assert!(check_secret_strength("TEST_SECRET", "kY8#mW2$qR5@tZ9!vN4%xJ7&bH3*fL6(").is_ok());
    }

    #[test]
    fn test_socket_addr_combines_host_and_port() {
        let config = ServerConfig {
            database_url: SecretString::from("postgres://localhost/retailradar"),
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
            jwt_secret: SecretString::from("kY8#mW2$qR5@tZ9!vN4%xJ7&bH3*fL6("),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }
}
