//! Data-shaping and source-selection layer for a product catalog front-end.
//!
//! This crate provides:
//! - The canonical [`Product`] model with pagination and query value objects
//! - Mapping from the remote API's wire shapes (re-exported from
//!   `catalog-api`) into the canonical model
//! - Interchangeable data sources behind one query contract: an HTTP client
//!   and two in-memory mocks with simulated latency and fault injection
//! - A provider that routes each call to the configured source
//! - Environment-derived configuration
//! - A search notification channel with input debouncing
//!
//! ## Usage
//!
//! ```ignore
//! use catalog_client::{CatalogConfig, CatalogProvider, ProductSource};
//!
//! let provider = CatalogProvider::new(CatalogConfig::detect())?;
//! let page = provider.get_products_page(&PageRequest::of(0, 10)).await?;
//! ```

mod client;
mod config;
mod error;
mod mock;
mod provider;
mod search;
mod types;

// Re-export the wire crate so consumers need only depend on catalog-client.
pub use catalog_api as api;
pub use client::{Client, HttpProductClient, ProductSource};
pub use config::{CatalogConfig, Environment, ParseEnvironmentError, CATALOG_ENV_VAR};
pub use error::CatalogClientError;
pub use mock::{AdvancedMockClient, MockBehavior, MockProductClient};
pub use provider::{CatalogProvider, ServiceMode};
pub use search::{
    SearchChannel,
    SearchDebouncer,
    SearchEvent,
    DEBOUNCE_WINDOW,
    MIN_SEARCH_TERM_LEN,
};
pub use types::{
    NewProduct,
    PageMetaData,
    PageRequest,
    PagedResponse,
    Product,
    ProductStatus,
    ProductUpdate,
    SearchFilters,
    SortField,
    SortOptions,
    SortOrder,
    DEFAULT_PAGE_NUMBER,
    DEFAULT_PAGE_SIZE,
};
