//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DEPOT_API_URL` - Base URL of the inventory REST backend
//!
//! ## Optional
//! - `DEPOT_API_TOKEN` - Bearer token sent with every backend request
//! - `DEPOT_API_TIMEOUT_SECS` - Backend request timeout (default: 30)
//! - `DEPOT_ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `DEPOT_ADMIN_PORT` - Listen port (default: 3001)
//! - `DEPOT_ADMIN_BASE_URL` - Public URL; `https://` enables secure cookies
//! - `DEPOT_PAGE_SIZE` - Rows per list page (default: 20)
//! - `DEPOT_LOW_STOCK_THRESHOLD` - Threshold for products without a reorder
//!   level (default: 10)
//! - `DEPOT_LOG_JSON` - Emit JSON logs when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`
//!
//! ## Optional (TLS)
//! - `DEPOT_ADMIN_TLS_CERT` - PEM-encoded certificate chain
//! - `DEPOT_ADMIN_TLS_KEY` - PEM-encoded private key

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PAGE_SIZE: usize = 20;
const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Token values that are clearly copied from a sample `.env`.
const PLACEHOLDER_PATTERNS: &[&str] = &["your-", "changeme", "replace", "placeholder", "xxx"];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Connection settings for the inventory REST backend.
///
/// Shared by the admin binary and the `depot` CLI.
#[derive(Clone)]
pub struct BackendConfig {
    /// Base URL every resource path is joined onto.
    pub base_url: Url,
    /// Bearer token, if the backend requires one.
    pub token: Option<SecretString>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BackendConfig {
    /// Build settings from raw values, normalizing the base URL so relative
    /// paths join underneath it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if the URL is not absolute
    /// `http(s)`.
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidEnvVar("DEPOT_API_URL".into(), reason);
        let mut url = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        let token = token
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .map(SecretString::from);
        Ok(Self {
            base_url: url,
            token,
            timeout,
        })
    }

    /// Whether the configured token looks like a sample value.
    #[must_use]
    pub fn token_looks_like_placeholder(&self) -> bool {
        self.token.as_ref().is_some_and(|token| {
            let lower = token.expose_secret().to_lowercase();
            PLACEHOLDER_PATTERNS.iter().any(|p| lower.contains(p))
        })
    }
}

/// TLS configuration for serving HTTPS directly.
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain.
    pub cert_pem: String,
    /// PEM-encoded private key.
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &"[CERTIFICATE]")
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Inventory backend connection.
    pub backend: BackendConfig,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the dashboard
    pub base_url: String,
    /// Rows per list page
    pub page_size: usize,
    /// Low-stock threshold for products without a reorder level
    pub low_stock_threshold: i64,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// TLS configuration for HTTPS (optional)
    pub tls: Option<TlsConfig>,
}

impl AdminConfig {
    /// Load configuration from the process environment (and `.env`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let timeout = Duration::from_secs(env.parsed("DEPOT_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?);
        let backend = BackendConfig::new(
            &env.required("DEPOT_API_URL")?,
            env.optional("DEPOT_API_TOKEN"),
            timeout,
        )?;

        let host = env.parsed("DEPOT_ADMIN_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = env.parsed("DEPOT_ADMIN_PORT", 3001_u16)?;
        let base_url = env
            .optional("DEPOT_ADMIN_BASE_URL")
            .unwrap_or_else(|| format!("http://{}", SocketAddr::new(host, port)));

        let page_size = env.parsed("DEPOT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if page_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "DEPOT_PAGE_SIZE".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let low_stock_threshold =
            env.parsed("DEPOT_LOW_STOCK_THRESHOLD", DEFAULT_LOW_STOCK_THRESHOLD)?;

        let tls = match (
            env.optional("DEPOT_ADMIN_TLS_CERT"),
            env.optional("DEPOT_ADMIN_TLS_KEY"),
        ) {
            (Some(cert), Some(key)) => Some(TlsConfig {
                cert_pem: cert,
                key_pem: SecretString::from(key),
            }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::InvalidEnvVar(
                    "DEPOT_ADMIN_TLS_*".to_string(),
                    "Both DEPOT_ADMIN_TLS_CERT and DEPOT_ADMIN_TLS_KEY must be set together"
                        .to_string(),
                ));
            }
        };

        Ok(Self {
            backend,
            host,
            port,
            base_url,
            page_size,
            low_stock_threshold,
            log_json: env.optional("DEPOT_LOG_JSON").is_some(),
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parsed("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: env.parsed("SENTRY_TRACES_SAMPLE_RATE", 0.1)?,
            tls,
        })
    }

    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the dashboard is served over HTTPS (secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.tls.is_some() || self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Non-blank value for `key`.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn parsed<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AdminConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AdminConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DEPOT_API_URL", "http://localhost:8080/api")]).unwrap();
        assert_eq!(config.backend.base_url.as_str(), "http://localhost:8080/api/");
        assert!(config.backend.token.is_none());
        assert_eq!(config.backend.timeout, Duration::from_secs(30));
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
        assert_eq!(config.base_url, "http://127.0.0.1:3001");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.low_stock_threshold, 10);
        assert!(!config.is_secure());
        assert!(!config.log_json);
        assert!(config.tls.is_none());
    }

    #[test]
    fn test_missing_api_url() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "DEPOT_API_URL"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(load(&[("DEPOT_API_URL", "not a url")]).is_err());
        assert!(load(&[("DEPOT_API_URL", "ftp://files.example")]).is_err());
        let err = load(&[
            ("DEPOT_API_URL", "http://api.local"),
            ("DEPOT_ADMIN_PORT", "eighty"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "DEPOT_ADMIN_PORT"));
        assert!(
            load(&[("DEPOT_API_URL", "http://api.local"), ("DEPOT_PAGE_SIZE", "0")]).is_err()
        );
    }

    #[test]
    fn test_tls_requires_both_parts() {
        let err = load(&[
            ("DEPOT_API_URL", "http://api.local"),
            ("DEPOT_ADMIN_TLS_CERT", "-----BEGIN CERTIFICATE-----"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(..)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = load(&[
            ("DEPOT_API_URL", "https://api.depot.example"),
            ("DEPOT_API_TOKEN", "tok_9f8e7d6c5b4a"),
            ("DEPOT_ADMIN_BASE_URL", "https://depot.example"),
        ])
        .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("tok_9f8e7d6c5b4a"));
        assert!(debug.contains("[REDACTED]"));
        assert!(config.is_secure());
    }

    #[test]
    fn test_placeholder_token_detection() {
        let backend = BackendConfig::new(
            "http://api.local",
            Some("your-token-here".into()),
            Duration::from_secs(5),
        )
        .unwrap();
        assert!(backend.token_looks_like_placeholder());

        let blank =
            BackendConfig::new("http://api.local", Some("  ".into()), Duration::from_secs(5))
                .unwrap();
        assert!(blank.token.is_none());
    }
}
