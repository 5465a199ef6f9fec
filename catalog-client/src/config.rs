//! Environment resolution and runtime configuration.
//!
//! Exactly one of three named environments is resolved at startup from the
//! deployment host name, with an explicit override variable for tests and
//! tooling. Each environment maps to a fixed configuration record consumed by
//! the provider. Nothing here persists across process restarts.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

/// Overrides host-name detection when set to one of the environment names.
pub const CATALOG_ENV_VAR: &str = "PRODUCT_CATALOG_ENV";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    #[default]
    Production,
}

#[derive(Debug, Error)]
#[error("unknown environment: {0}")]
pub struct ParseEnvironmentError(String);

impl FromStr for Environment {
    type Err = ParseEnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ParseEnvironmentError(other.to_string())),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        };
        write!(f, "{name}")
    }
}

impl Environment {
    /// Classify a deployment host name: loopback hosts are development, hosts
    /// containing "staging" are staging, everything else is production.
    pub fn from_host(host: &str) -> Self {
        if host == "localhost" || host == "127.0.0.1" {
            Environment::Development
        } else if host.contains("staging") {
            Environment::Staging
        } else {
            Environment::Production
        }
    }

    /// Resolve the environment once, during initialization.
    ///
    /// [`CATALOG_ENV_VAR`] wins when set and parseable; otherwise the host
    /// name is classified. Without either, production is assumed.
    pub fn detect() -> Self {
        if let Ok(value) = std::env::var(CATALOG_ENV_VAR) {
            if let Ok(environment) = value.parse() {
                debug!(%environment, "environment forced via {CATALOG_ENV_VAR}");
                return environment;
            }
        }
        match std::env::var("HOSTNAME") {
            Ok(host) => Self::from_host(&host),
            Err(_) => Environment::Production,
        }
    }
}

/// The active configuration record.
///
/// Fixed defaults per environment; partial overrides are applied in place via
/// [`CatalogConfig::update`] and undone with [`CatalogConfig::reset`].
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    pub environment: Environment,
    /// Route queries to the in-memory mock instead of the HTTP client.
    pub use_mock_services: bool,
    /// Prefix of the item endpoints, up to and including `/api`.
    pub api_base_url: String,
    pub enable_logging: bool,
    /// Artificial latency applied by the mock adapters.
    pub mock_delay: Duration,
    pub simulate_errors: bool,
}

impl CatalogConfig {
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Development => Self {
                environment,
                use_mock_services: true,
                api_base_url: "http://localhost:3000/api".to_string(),
                enable_logging: true,
                mock_delay: Duration::from_millis(500),
                simulate_errors: false,
            },
            Environment::Staging => Self {
                environment,
                use_mock_services: false,
                api_base_url: "https://staging-api.example.com/api".to_string(),
                enable_logging: true,
                mock_delay: Duration::ZERO,
                simulate_errors: false,
            },
            Environment::Production => Self {
                environment,
                use_mock_services: false,
                api_base_url: "https://api.example.com/api".to_string(),
                enable_logging: false,
                mock_delay: Duration::ZERO,
                simulate_errors: false,
            },
        }
    }

    /// Resolve the environment and return its configuration.
    pub fn detect() -> Self {
        Self::for_environment(Environment::detect())
    }

    /// Apply a partial override on top of the active record.
    pub fn update(&mut self, update: impl FnOnce(&mut Self)) {
        update(self);
    }

    /// Restore the active environment's defaults.
    pub fn reset(&mut self) {
        *self = Self::for_environment(self.environment);
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_hosts_resolve_to_development() {
        assert_eq!(Environment::from_host("localhost"), Environment::Development);
        assert_eq!(Environment::from_host("127.0.0.1"), Environment::Development);
    }

    #[test]
    fn staging_substring_resolves_to_staging() {
        assert_eq!(
            Environment::from_host("staging-api.example.com"),
            Environment::Staging
        );
    }

    #[test]
    fn everything_else_resolves_to_production() {
        assert_eq!(
            Environment::from_host("shop.example.com"),
            Environment::Production
        );
    }

    #[test]
    fn environment_names_round_trip() {
        for environment in [
            Environment::Development,
            Environment::Staging,
            Environment::Production,
        ] {
            assert_eq!(
                environment.to_string().parse::<Environment>().unwrap(),
                environment
            );
        }
        assert!("garbage".parse::<Environment>().is_err());
    }

    #[test]
    fn development_defaults_use_mocks() {
        let config = CatalogConfig::for_environment(Environment::Development);
        assert!(config.use_mock_services);
        assert!(config.enable_logging);
        assert_eq!(config.mock_delay, Duration::from_millis(500));
    }

    #[test]
    fn production_defaults_use_real_service() {
        let config = CatalogConfig::for_environment(Environment::Production);
        assert!(!config.use_mock_services);
        assert!(!config.enable_logging);
    }

    #[test]
    fn update_and_reset_round_trip() {
        let mut config = CatalogConfig::for_environment(Environment::Development);
        config.update(|c| {
            c.use_mock_services = false;
            c.mock_delay = Duration::ZERO;
        });
        assert!(!config.use_mock_services);

        config.reset();
        assert_eq!(
            config,
            CatalogConfig::for_environment(Environment::Development)
        );
    }
}
