//! Routing of query-contract calls to one concrete data source.
//!
//! The provider owns its configuration and every candidate client; nothing
//! here is process-global. Mode selection is re-evaluated on every call, so a
//! config change between calls takes effect immediately. Failures pass
//! through unchanged; the provider never retries.

use std::fmt::Display;

use tracing::debug;

use crate::client::{Client, HttpProductClient, ProductSource};
use crate::config::CatalogConfig;
use crate::error::CatalogClientError;
use crate::mock::{AdvancedMockClient, MockProductClient};
use crate::types::{PageRequest, PagedResponse, Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceMode {
    Mock,
    Real,
}

impl Display for ServiceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceMode::Mock => write!(f, "mock"),
            ServiceMode::Real => write!(f, "real"),
        }
    }
}

/// Selects one of the candidate data sources per call: the basic mock, the
/// fault-injecting advanced mock, or the HTTP client.
#[derive(Debug)]
pub struct CatalogProvider {
    config: CatalogConfig,
    mock: Client,
    advanced_mock: Client,
    real: Client,
}

impl CatalogProvider {
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogClientError> {
        let mock = Client::Mock(MockProductClient::from_config(&config));
        let advanced_mock = Client::AdvancedMock(AdvancedMockClient::from_config(&config));
        let real = Client::Http(HttpProductClient::new(&config)?);
        Ok(Self {
            config,
            mock,
            advanced_mock,
            real,
        })
    }

    /// Build a provider with explicit clients, bypassing construction from
    /// config. Useful for wiring a seeded mock in tests.
    pub fn with_clients(
        config: CatalogConfig,
        mock: Client,
        advanced_mock: Client,
        real: Client,
    ) -> Self {
        Self {
            config,
            mock,
            advanced_mock,
            real,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Apply a partial config override; every candidate client is rebuilt so
    /// a changed base URL or fault-injection flag takes effect.
    pub fn update_config(
        &mut self,
        update: impl FnOnce(&mut CatalogConfig),
    ) -> Result<(), CatalogClientError> {
        self.config.update(update);
        self.mock = Client::Mock(MockProductClient::from_config(&self.config));
        self.advanced_mock = Client::AdvancedMock(AdvancedMockClient::from_config(&self.config));
        self.real = Client::Http(HttpProductClient::new(&self.config)?);
        Ok(())
    }

    /// Route every subsequent call to the mock source.
    pub fn force_mock_mode(&mut self) {
        self.config.update(|config| config.use_mock_services = true);
    }

    /// Route every subsequent call to the real source.
    pub fn force_real_mode(&mut self) {
        self.config.update(|config| config.use_mock_services = false);
    }

    pub fn current_service_type(&self) -> ServiceMode {
        if self.config.use_mock_services {
            ServiceMode::Mock
        } else {
            ServiceMode::Real
        }
    }

    fn active(&self) -> &Client {
        let mode = self.current_service_type();
        if self.config.enable_logging {
            debug!(%mode, "dispatching catalog call");
        }
        match mode {
            // Error simulation needs the fault-injecting mock.
            ServiceMode::Mock if self.config.simulate_errors => &self.advanced_mock,
            ServiceMode::Mock => &self.mock,
            ServiceMode::Real => &self.real,
        }
    }
}

impl ProductSource for CatalogProvider {
    async fn get_products(&self) -> Result<Vec<Product>, CatalogClientError> {
        self.active().get_products().await
    }

    async fn get_product_by_id(
        &self,
        id: impl AsRef<str> + Send + Sync,
    ) -> Result<Option<Product>, CatalogClientError> {
        self.active().get_product_by_id(id).await
    }

    async fn get_products_by_category(
        &self,
        category: impl AsRef<str> + Send + Sync,
    ) -> Result<Vec<Product>, CatalogClientError> {
        self.active().get_products_by_category(category).await
    }

    async fn search_products(
        &self,
        term: impl AsRef<str> + Send + Sync,
    ) -> Result<Vec<Product>, CatalogClientError> {
        self.active().search_products(term).await
    }

    async fn get_products_page(
        &self,
        request: &PageRequest,
    ) -> Result<PagedResponse<Product>, CatalogClientError> {
        self.active().get_products_page(request).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::Environment;

    fn dev_provider() -> CatalogProvider {
        let mut config = CatalogConfig::for_environment(Environment::Development);
        config.mock_delay = Duration::ZERO;
        CatalogProvider::new(config).unwrap()
    }

    #[test]
    fn mock_config_selects_mock_service() {
        let provider = dev_provider();
        assert_eq!(provider.current_service_type(), ServiceMode::Mock);
    }

    #[test]
    fn forcing_modes_takes_effect_immediately() {
        let mut provider = dev_provider();

        provider.force_real_mode();
        assert_eq!(provider.current_service_type(), ServiceMode::Real);

        provider.force_mock_mode();
        assert_eq!(provider.current_service_type(), ServiceMode::Mock);
    }

    #[test]
    fn production_config_selects_real_service() {
        let provider =
            CatalogProvider::new(CatalogConfig::for_environment(Environment::Production)).unwrap();
        assert_eq!(provider.current_service_type(), ServiceMode::Real);
    }

    #[tokio::test]
    async fn forwards_calls_to_the_mock_source() {
        let mut provider = dev_provider();
        provider.force_mock_mode();

        let products = provider.get_products().await.unwrap();
        assert!(!products.is_empty());

        let by_id = provider.get_product_by_id(&products[0].id).await.unwrap();
        assert_eq!(by_id.as_ref(), Some(&products[0]));
    }

    #[tokio::test]
    async fn simulate_errors_config_injects_faults_through_the_provider() {
        let mut provider = dev_provider();
        provider
            .update_config(|config| config.simulate_errors = true)
            .unwrap();

        // Each call is an independent trial at the advanced mock's default
        // error rate; across this many calls at least one must fail.
        let mut saw_simulated = false;
        for _ in 0..200 {
            match provider.get_products().await {
                Ok(_) => continue,
                Err(CatalogClientError::Simulated(_)) => {
                    saw_simulated = true;
                    break;
                },
                Err(other) => panic!("expected Simulated error, got {other:?}"),
            }
        }
        assert!(saw_simulated);
    }

    #[tokio::test]
    async fn mode_is_reevaluated_between_calls() {
        let mut provider = dev_provider();
        provider.update_config(|config| config.use_mock_services = true).unwrap();
        assert!(!provider.get_products().await.unwrap().is_empty());

        // Point the real client at an unroutable address; switching modes must
        // change the outcome of the very next call.
        provider
            .update_config(|config| {
                config.use_mock_services = false;
                config.api_base_url = "http://127.0.0.1:1/api".to_string();
            })
            .unwrap();
        assert!(provider.get_products().await.is_err());
    }
}
