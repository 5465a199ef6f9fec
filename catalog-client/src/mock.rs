//! In-memory data sources with simulated latency and fault injection.
//!
//! Both mocks hold their product list behind `Arc<Mutex<..>>` so the query
//! contract can stay `&self` while writes substitute records in place. The
//! artificial delay only affects when a result becomes observable, never its
//! content.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;
use tracing::debug;

use crate::client::ProductSource;
use crate::config::CatalogConfig;
use crate::error::CatalogClientError;
use crate::types::{
    NewProduct,
    PageRequest,
    PagedResponse,
    Product,
    ProductStatus,
    ProductUpdate,
    SearchFilters,
    SortOptions,
};

// Arc allows handing the same backing list to clones of a client,
// Mutex keeps the query contract at `&self`.
type MockField<T> = Arc<Mutex<T>>;

/// Messages a fault-injection trial picks from, uniformly at random.
const FAULT_MESSAGES: &[&str] = &[
    "network timeout",
    "internal server error",
    "service temporarily unavailable",
    "connection reset by peer",
];

fn product(
    id: &str,
    name: &str,
    description: &str,
    quantity: u32,
    status: ProductStatus,
    unit_price: f64,
    category: &str,
    image_url: &str,
) -> Product {
    Product {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        quantity,
        status,
        unit_price,
        category: category.into(),
        image_url: image_url.into(),
    }
}

fn basic_fixture() -> Vec<Product> {
    use ProductStatus::*;
    vec![
        product(
            "1",
            "iPhone 15 Pro",
            "Latest generation smartphone with an advanced camera",
            12,
            Available,
            699.99,
            "Electronics",
            "assets/img/product01.png",
        ),
        product(
            "2",
            "MacBook Pro M3",
            "Professional laptop for developers",
            5,
            Available,
            1299.99,
            "Electronics",
            "assets/img/product02.png",
        ),
        product(
            "3",
            "Nike Air Max",
            "Comfortable and trendy sport sneakers",
            20,
            Available,
            149.99,
            "Fashion",
            "assets/img/product03.png",
        ),
        product(
            "4",
            "Sony WH-1000XM5",
            "Wireless headphones with noise cancelling",
            8,
            Available,
            299.99,
            "Electronics",
            "assets/img/product04.png",
        ),
        product(
            "5",
            "Apple Watch Series 9",
            "Smartwatch with built-in GPS",
            10,
            Available,
            399.99,
            "Electronics",
            "assets/img/product05.png",
        ),
        product(
            "6",
            "North Face Jacket",
            "Waterproof winter jacket",
            7,
            Available,
            199.99,
            "Fashion",
            "assets/img/product06.png",
        ),
        product(
            "7",
            "iPad Pro 12.9",
            "Tablet for creatives and professionals",
            0,
            OutOfStock,
            599.99,
            "Electronics",
            "assets/img/product07.png",
        ),
        product(
            "8",
            "Travel Backpack Pro",
            "Durable high-capacity travel backpack",
            15,
            Available,
            89.99,
            "Travel",
            "assets/img/product08.png",
        ),
    ]
}

fn advanced_fixture() -> Vec<Product> {
    use ProductStatus::*;
    vec![
        product(
            "1",
            "Galaxy S24 Ultra",
            "Premium smartphone with an advanced camera",
            10,
            Available,
            899.99,
            "Electronics",
            "assets/img/product01.png",
        ),
        product(
            "2",
            "ASUS ROG Strix",
            "Gaming laptop for professionals",
            5,
            Available,
            1599.99,
            "Electronics",
            "assets/img/product02.png",
        ),
        product(
            "3",
            "Levi's 501",
            "High quality designer jeans",
            15,
            Available,
            129.99,
            "Fashion",
            "assets/img/product03.png",
        ),
        product(
            "4",
            "AirPods Pro 2",
            "Wireless earbuds with noise cancellation",
            8,
            Available,
            179.99,
            "Electronics",
            "assets/img/product04.png",
        ),
        product(
            "5",
            "Fitbit Versa 4",
            "Advanced fitness tracker",
            12,
            Available,
            249.99,
            "Electronics",
            "assets/img/product05.png",
        ),
    ]
}

/// A data source backed by a fixed in-memory product list.
#[derive(Debug, Clone)]
pub struct MockProductClient {
    products: MockField<Vec<Product>>,
    delay: Duration,
}

impl MockProductClient {
    pub fn new(delay: Duration) -> Self {
        Self::with_products(basic_fixture(), delay)
    }

    pub fn with_products(products: Vec<Product>, delay: Duration) -> Self {
        Self {
            products: Arc::new(Mutex::new(products)),
            delay,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.mock_delay)
    }

    fn snapshot(&self) -> Vec<Product> {
        self.products
            .lock()
            .expect("couldn't acquire mock lock")
            .clone()
    }
}

impl ProductSource for MockProductClient {
    async fn get_products(&self) -> Result<Vec<Product>, CatalogClientError> {
        sleep(self.delay).await;
        Ok(self.snapshot())
    }

    async fn get_product_by_id(
        &self,
        id: impl AsRef<str> + Send + Sync,
    ) -> Result<Option<Product>, CatalogClientError> {
        sleep(self.delay).await;
        let id = id.as_ref();
        Ok(self.snapshot().into_iter().find(|product| product.id == id))
    }

    async fn get_products_by_category(
        &self,
        category: impl AsRef<str> + Send + Sync,
    ) -> Result<Vec<Product>, CatalogClientError> {
        sleep(self.delay).await;
        let category = category.as_ref();
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|product| product.category.eq_ignore_ascii_case(category))
            .collect())
    }

    async fn search_products(
        &self,
        term: impl AsRef<str> + Send + Sync,
    ) -> Result<Vec<Product>, CatalogClientError> {
        sleep(self.delay).await;
        let term = term.as_ref();
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|product| product.matches_term(term))
            .collect())
    }

    async fn get_products_page(
        &self,
        request: &PageRequest,
    ) -> Result<PagedResponse<Product>, CatalogClientError> {
        sleep(self.delay).await;
        Ok(request.paginate(self.snapshot()))
    }
}

/// Knobs for the advanced mock, settable per instance at any time.
#[derive(Debug, Clone, PartialEq)]
pub struct MockBehavior {
    pub network_delay: Duration,
    pub simulate_errors: bool,
    /// Probability in `[0, 1]` that a call fails; an independent trial per call.
    pub error_rate: f64,
    pub enable_logging: bool,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            network_delay: Duration::from_millis(500),
            simulate_errors: false,
            error_rate: 0.1,
            enable_logging: false,
        }
    }
}

/// An in-memory data source with fault injection and write operations.
#[derive(Debug, Clone)]
pub struct AdvancedMockClient {
    products: MockField<Vec<Product>>,
    behavior: MockField<MockBehavior>,
}

impl Default for AdvancedMockClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AdvancedMockClient {
    pub fn new() -> Self {
        Self::with_products(advanced_fixture(), MockBehavior::default())
    }

    pub fn with_products(products: Vec<Product>, behavior: MockBehavior) -> Self {
        Self {
            products: Arc::new(Mutex::new(products)),
            behavior: Arc::new(Mutex::new(behavior)),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::with_products(advanced_fixture(), MockBehavior {
            network_delay: config.mock_delay,
            simulate_errors: config.simulate_errors,
            enable_logging: config.enable_logging,
            ..MockBehavior::default()
        })
    }

    /// Apply a partial behavior override.
    pub fn configure(&self, update: impl FnOnce(&mut MockBehavior)) {
        let mut behavior = self.behavior.lock().expect("couldn't acquire mock lock");
        update(&mut behavior);
    }

    fn snapshot(&self) -> Vec<Product> {
        self.products
            .lock()
            .expect("couldn't acquire mock lock")
            .clone()
    }

    /// Delay, log, and run the fault-injection trial for one call.
    async fn begin_call(&self, operation: &str) -> Result<(), CatalogClientError> {
        let behavior = self
            .behavior
            .lock()
            .expect("couldn't acquire mock lock")
            .clone();
        if behavior.enable_logging {
            debug!(operation, "advanced mock call");
        }
        sleep(behavior.network_delay).await;
        if behavior.simulate_errors {
            let mut rng = rand::thread_rng();
            if rng.gen::<f64>() < behavior.error_rate {
                let message = FAULT_MESSAGES[rng.gen_range(0..FAULT_MESSAGES.len())];
                return Err(CatalogClientError::Simulated(message.to_string()));
            }
        }
        Ok(())
    }

    /// Search with combined field filters and an optional sort.
    pub async fn search_with_options(
        &self,
        filters: &SearchFilters,
        sort: Option<&SortOptions>,
    ) -> Result<Vec<Product>, CatalogClientError> {
        self.begin_call("search_with_options").await?;
        let mut products: Vec<Product> = self
            .snapshot()
            .into_iter()
            .filter(|product| filters.matches(product))
            .collect();
        if let Some(sort) = sort {
            sort.apply(&mut products);
        }
        Ok(products)
    }

    /// Distinct category labels in first-seen order.
    pub async fn get_categories(&self) -> Result<Vec<String>, CatalogClientError> {
        self.begin_call("get_categories").await?;
        let mut categories: Vec<String> = Vec::new();
        for product in self.snapshot() {
            if !categories.contains(&product.category) {
                categories.push(product.category);
            }
        }
        Ok(categories)
    }

    /// Insert a new product, assigning the next free numeric id.
    ///
    /// Rejects empty names or descriptions and non-positive prices without
    /// touching the list.
    pub async fn create_product(&self, new: NewProduct) -> Result<Product, CatalogClientError> {
        self.begin_call("create_product").await?;
        if new.name.trim().is_empty() {
            return Err(CatalogClientError::Validation(
                "name must not be empty".to_string(),
            ));
        }
        if new.description.trim().is_empty() {
            return Err(CatalogClientError::Validation(
                "description must not be empty".to_string(),
            ));
        }
        if new.unit_price.is_nan() || new.unit_price <= 0.0 {
            return Err(CatalogClientError::Validation(
                "unit price must be positive".to_string(),
            ));
        }

        let mut products = self.products.lock().expect("couldn't acquire mock lock");
        let next_id = products
            .iter()
            .filter_map(|product| product.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let created = Product::from_new(new, next_id.to_string());
        products.push(created.clone());
        Ok(created)
    }

    /// Substitute the record for `id` with an updated copy.
    pub async fn update_product(
        &self,
        id: impl AsRef<str> + Send + Sync,
        update: &ProductUpdate,
    ) -> Result<Option<Product>, CatalogClientError> {
        self.begin_call("update_product").await?;
        let id = id.as_ref();
        let mut products = self.products.lock().expect("couldn't acquire mock lock");
        let Some(existing) = products.iter_mut().find(|product| product.id == id) else {
            return Ok(None);
        };
        let updated = update.apply_to(existing);
        *existing = updated.clone();
        Ok(Some(updated))
    }

    pub async fn delete_product(
        &self,
        id: impl AsRef<str> + Send + Sync,
    ) -> Result<bool, CatalogClientError> {
        self.begin_call("delete_product").await?;
        let id = id.as_ref();
        let mut products = self.products.lock().expect("couldn't acquire mock lock");
        let before = products.len();
        products.retain(|product| product.id != id);
        Ok(products.len() < before)
    }
}

impl ProductSource for AdvancedMockClient {
    async fn get_products(&self) -> Result<Vec<Product>, CatalogClientError> {
        self.begin_call("get_products").await?;
        Ok(self.snapshot())
    }

    async fn get_product_by_id(
        &self,
        id: impl AsRef<str> + Send + Sync,
    ) -> Result<Option<Product>, CatalogClientError> {
        self.begin_call("get_product_by_id").await?;
        let id = id.as_ref();
        Ok(self.snapshot().into_iter().find(|product| product.id == id))
    }

    async fn get_products_by_category(
        &self,
        category: impl AsRef<str> + Send + Sync,
    ) -> Result<Vec<Product>, CatalogClientError> {
        self.begin_call("get_products_by_category").await?;
        let category = category.as_ref();
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|product| product.category.eq_ignore_ascii_case(category))
            .collect())
    }

    async fn search_products(
        &self,
        term: impl AsRef<str> + Send + Sync,
    ) -> Result<Vec<Product>, CatalogClientError> {
        self.begin_call("search_products").await?;
        let term = term.as_ref();
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|product| product.matches_term(term))
            .collect())
    }

    async fn get_products_page(
        &self,
        request: &PageRequest,
    ) -> Result<PagedResponse<Product>, CatalogClientError> {
        self.begin_call("get_products_page").await?;
        Ok(request.paginate(self.snapshot()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::{SortField, SortOrder};

    fn quick_mock() -> MockProductClient {
        MockProductClient::new(Duration::ZERO)
    }

    fn quick_advanced() -> AdvancedMockClient {
        let client = AdvancedMockClient::new();
        client.configure(|behavior| behavior.network_delay = Duration::ZERO);
        client
    }

    #[tokio::test(start_paused = true)]
    async fn basic_mock_returns_seeded_products() {
        let products = MockProductClient::new(Duration::from_millis(500))
            .get_products()
            .await
            .unwrap();
        assert_eq!(products.len(), 8);
    }

    #[tokio::test]
    async fn finds_product_by_id_and_reports_absence() {
        let mock = quick_mock();
        let product = mock.get_product_by_id("3").await.unwrap().unwrap();
        assert_eq!(product.name, "Nike Air Max");
        assert!(mock.get_product_by_id("999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn category_filter_ignores_case() {
        let mock = quick_mock();
        let lower = mock.get_products_by_category("electronics").await.unwrap();
        let upper = mock.get_products_by_category("Electronics").await.unwrap();
        assert_eq!(lower, upper);
        assert!(!lower.is_empty());
        assert!(lower.iter().all(|p| p.category == "Electronics"));
    }

    #[tokio::test]
    async fn search_matches_description_substring_both_cases() {
        let mock = quick_mock();
        let capitalized = mock.search_products("Wireless").await.unwrap();
        let lowercase = mock.search_products("wireless").await.unwrap();
        assert_eq!(capitalized, lowercase);
        assert!(capitalized.iter().any(|p| p.id == "4"));
    }

    #[tokio::test]
    async fn pagination_slices_and_reports_totals() {
        let mock = quick_mock();
        let page = mock
            .get_products_page(&PageRequest::of(0, 3))
            .await
            .unwrap();
        assert_eq!(page.number_of_elements(), 3);
        assert_eq!(page.page_meta_data.total_elements, 8);
        assert_eq!(page.page_meta_data.total_pages, 3);
        assert!(page.page_meta_data.is_first_page());

        let last = mock
            .get_products_page(&PageRequest::of(2, 3))
            .await
            .unwrap();
        assert_eq!(last.number_of_elements(), 2);
        assert!(last.page_meta_data.is_last_page());

        let beyond = mock
            .get_products_page(&PageRequest::of(9, 3))
            .await
            .unwrap();
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn advanced_search_filters_and_sorts_by_price() {
        let client = quick_advanced();
        let filters = SearchFilters {
            category: Some("Electronics".into()),
            min_price: Some(100.0),
            max_price: Some(1000.0),
            ..Default::default()
        };
        let sort = SortOptions::new(SortField::UnitPrice, SortOrder::Asc);

        let products = client
            .search_with_options(&filters, Some(&sort))
            .await
            .unwrap();

        assert!(!products.is_empty());
        for product in &products {
            assert_eq!(product.category, "Electronics");
            assert!((100.0..=1000.0).contains(&product.unit_price));
        }
        for pair in products.windows(2) {
            assert!(pair[0].unit_price <= pair[1].unit_price);
        }
    }

    #[tokio::test]
    async fn categories_are_distinct_in_first_seen_order() {
        let categories = quick_advanced().get_categories().await.unwrap();
        assert_eq!(categories, vec!["Electronics".to_string(), "Fashion".to_string()]);
    }

    #[tokio::test]
    async fn create_assigns_next_id_and_persists() {
        let client = quick_advanced();
        let created = client
            .create_product(NewProduct {
                name: "Kindle Paperwhite".into(),
                description: "E-reader with adjustable warm light".into(),
                quantity: 9,
                status: ProductStatus::Available,
                unit_price: 139.99,
                category: "Electronics".into(),
                image_url: "assets/img/product09.png".into(),
            })
            .await
            .unwrap();
        assert_eq!(created.id, "6");

        let fetched = client.get_product_by_id("6").await.unwrap();
        assert_eq!(fetched.as_ref(), Some(&created));
    }

    #[tokio::test]
    async fn create_rejects_invalid_payloads_without_inserting() {
        let client = quick_advanced();
        let valid = NewProduct {
            name: "Webcam".into(),
            description: "1080p USB webcam".into(),
            quantity: 3,
            status: ProductStatus::Available,
            unit_price: 49.99,
            category: "Electronics".into(),
            image_url: "assets/img/product10.png".into(),
        };

        for invalid in [
            NewProduct {
                name: "   ".into(),
                ..valid.clone()
            },
            NewProduct {
                description: String::new(),
                ..valid.clone()
            },
            NewProduct {
                unit_price: 0.0,
                ..valid.clone()
            },
            NewProduct {
                unit_price: -10.0,
                ..valid.clone()
            },
        ] {
            let result = client.create_product(invalid).await;
            assert!(
                matches!(result, Err(CatalogClientError::Validation(_))),
                "expected Validation error, got {result:?}"
            );
        }
        assert_eq!(client.get_products().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn update_substitutes_record_and_reports_absence() {
        let client = quick_advanced();
        let update = ProductUpdate {
            unit_price: Some(219.99),
            quantity: Some(2),
            ..Default::default()
        };

        let updated = client.update_product("5", &update).await.unwrap().unwrap();
        assert_eq!(updated.unit_price, 219.99);
        assert_eq!(updated.quantity, 2);
        assert_eq!(updated.name, "Fitbit Versa 4");

        let fetched = client.get_product_by_id("5").await.unwrap().unwrap();
        assert_eq!(fetched, updated);

        assert!(client.update_product("999", &update).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let client = quick_advanced();
        assert!(client.delete_product("3").await.unwrap());
        assert!(!client.delete_product("3").await.unwrap());
        assert_eq!(client.get_products().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn full_error_rate_fails_every_call() {
        let client = quick_advanced();
        client.configure(|behavior| {
            behavior.simulate_errors = true;
            behavior.error_rate = 1.0;
        });

        let result = client.get_products().await;
        match result {
            Err(CatalogClientError::Simulated(message)) => {
                assert!(FAULT_MESSAGES.contains(&message.as_str()));
            },
            other => panic!("expected Simulated error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn zero_error_rate_never_fails() {
        let client = quick_advanced();
        client.configure(|behavior| {
            behavior.simulate_errors = true;
            behavior.error_rate = 0.0;
        });
        for _ in 0..20 {
            client.get_products().await.unwrap();
        }
    }
}
