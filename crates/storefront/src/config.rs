//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>).
//!   An `https` URL marks the session cookie `Secure`.
//! - `CHECKOUT_SETTLEMENT_DELAY_MS` - Simulated payment processing time (default: 2000)
//! - `CHECKOUT_CANCEL_ON_LEAVE` - Abort a processing checkout when the shopper
//!   navigates away (default: false)
//! - `SESSION_IDLE_TIMEOUT_SECS` - Drop inactive shopper sessions after this long
//!   (default: 604800, one week)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_SETTLEMENT_DELAY_MS: &str = "2000";
const DEFAULT_SESSION_IDLE_SECS: &str = "604800";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: Url,
    pub checkout: CheckoutSettings,
    /// How long an untouched shopper session is kept
    pub session_idle_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
}

/// Checkout simulation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// Time between submission and confirmation.
    pub settlement_delay: Duration,
    /// Whether leaving the checkout screen aborts a pending settlement.
    pub cancel_on_leave: bool,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            settlement_delay: Duration::from_millis(2000),
            cancel_on_leave: false,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparsable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = env.parse_or("STOREFRONT_HOST", "127.0.0.1")?;
        let port = env.parse_or("STOREFRONT_PORT", "3000")?;
        let base_url = env.parse_or("STOREFRONT_BASE_URL", "http://localhost:3000")?;

        let delay_ms: u64 = env.parse_or("CHECKOUT_SETTLEMENT_DELAY_MS", DEFAULT_SETTLEMENT_DELAY_MS)?;
        let cancel_on_leave = env.parse_or("CHECKOUT_CANCEL_ON_LEAVE", "false")?;
        let idle_secs: u64 = env.parse_or("SESSION_IDLE_TIMEOUT_SECS", DEFAULT_SESSION_IDLE_SECS)?;

        Ok(Self {
            host,
            port,
            base_url,
            checkout: CheckoutSettings {
                settlement_delay: Duration::from_millis(delay_ms),
                cancel_on_leave,
            },
            session_idle_timeout: Duration::from_secs(idle_secs),
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.scheme() == "https"
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
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.optional(key).unwrap_or_else(|| default.to_string());
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.base_url.as_str(), "http://localhost:3000/");
        assert_eq!(config.checkout, CheckoutSettings::default());
        assert_eq!(config.session_idle_timeout, Duration::from_secs(604_800));
        assert!(!config.secure_cookies());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
            ("STOREFRONT_BASE_URL", "https://elenavirtanen.art"),
            ("CHECKOUT_SETTLEMENT_DELAY_MS", "50"),
            ("CHECKOUT_CANCEL_ON_LEAVE", "true"),
            ("SESSION_IDLE_TIMEOUT_SECS", "60"),
            ("SENTRY_ENVIRONMENT", "production"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert!(config.secure_cookies());
        assert_eq!(config.checkout.settlement_delay, Duration::from_millis(50));
        assert!(config.checkout.cancel_on_leave);
        assert_eq!(config.session_idle_timeout, Duration::from_secs(60));
        assert_eq!(config.sentry_environment.as_deref(), Some("production"));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("STOREFRONT_PORT", "  "), ("SENTRY_DSN", "")]).unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for (key, value) in [
            ("STOREFRONT_PORT", "eighty"),
            ("STOREFRONT_HOST", "localhost"),
            ("STOREFRONT_BASE_URL", "not a url"),
            ("CHECKOUT_SETTLEMENT_DELAY_MS", "-1"),
            ("CHECKOUT_CANCEL_ON_LEAVE", "yes"),
        ] {
            let err = load(&[(key, value)]).unwrap_err();
            let ConfigError::InvalidEnvVar(name, _) = err;
            assert_eq!(name, key);
        }
    }
}
