//! The data-source query contract and the HTTP-backed client.

use std::future::Future;
use std::time::Duration;

use async_stream::try_stream;
use catalog_api::{ItemWire, PagedEnvelope};
use enum_dispatch::enum_dispatch;
use futures::stream::Stream;
use futures::TryStreamExt;
use reqwest::StatusCode;
use url::Url;

use crate::config::CatalogConfig;
use crate::error::{self, CatalogClientError};
use crate::mock::{AdvancedMockClient, MockProductClient};
use crate::types::{PageRequest, PagedResponse, Product};

/// Page size used when depaging the full catalog.
const RESPONSE_PAGE_SIZE: u32 = 100;

/// The query contract every data source implements.
///
/// Not-found is `Ok(None)`, never an error. `get_products` always means the
/// full set; page-at-a-time access goes through `get_products_page` so that
/// pagination behaves identically across sources.
#[enum_dispatch]
#[allow(async_fn_in_trait)]
pub trait ProductSource {
    /// Fetch the full catalog.
    async fn get_products(&self) -> Result<Vec<Product>, CatalogClientError>;

    /// Fetch a single product by id.
    async fn get_product_by_id(
        &self,
        id: impl AsRef<str> + Send + Sync,
    ) -> Result<Option<Product>, CatalogClientError>;

    /// Fetch products whose category matches exactly, ignoring case.
    async fn get_products_by_category(
        &self,
        category: impl AsRef<str> + Send + Sync,
    ) -> Result<Vec<Product>, CatalogClientError>;

    /// Fetch products whose name or description contains `term`, ignoring case.
    async fn search_products(
        &self,
        term: impl AsRef<str> + Send + Sync,
    ) -> Result<Vec<Product>, CatalogClientError>;

    /// Fetch one page described by `request`.
    async fn get_products_page(
        &self,
        request: &PageRequest,
    ) -> Result<PagedResponse<Product>, CatalogClientError>;
}

/// Either a client for the real catalog service or one of the in-memory mocks.
#[derive(Debug)]
#[enum_dispatch(ProductSource)]
pub enum Client {
    Http(HttpProductClient),
    Mock(MockProductClient),
    AdvancedMock(AdvancedMockClient),
}

/// A client for the remote catalog API.
///
/// Every response body is routed through the wire-to-domain mapping; transport
/// failures are surfaced unchanged to the caller, with no retry.
#[derive(Debug)]
pub struct HttpProductClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpProductClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogClientError> {
        Self::with_base_url(&config.api_base_url)
    }

    /// Create a client against `base_url`, the prefix up to and including `/api`.
    pub fn with_base_url(base_url: &str) -> Result<Self, CatalogClientError> {
        Ok(Self {
            http: build_http_client()?,
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, tail: &str) -> Result<Url, CatalogClientError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{tail}"))?)
    }

    async fn fetch_items_page(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<PagedEnvelope<ItemWire>, CatalogClientError> {
        let url = self.endpoint("items")?;
        let response = self
            .http
            .get(url)
            .query(&[("page", page), ("pageSize", page_size)])
            .send()
            .await?;
        parse_success(response).await
    }

    async fn fetch_category_page(
        &self,
        category: &str,
        page: u32,
        page_size: u32,
    ) -> Result<PagedEnvelope<ItemWire>, CatalogClientError> {
        let url = self.endpoint(&format!("items/{category}"))?;
        let response = self
            .http
            .get(url)
            .query(&[("page", page), ("pageSize", page_size)])
            .send()
            .await?;
        parse_success(response).await
    }
}

impl ProductSource for HttpProductClient {
    async fn get_products(&self) -> Result<Vec<Product>, CatalogClientError> {
        depage_stream(|page| self.fetch_items_page(page, RESPONSE_PAGE_SIZE))
            .map_ok(Product::from)
            .try_collect()
            .await
    }

    async fn get_product_by_id(
        &self,
        id: impl AsRef<str> + Send + Sync,
    ) -> Result<Option<Product>, CatalogClientError> {
        let url = self.endpoint(&format!("items/{}", id.as_ref()))?;
        let response = self.http.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(error::from_error_response(response).await);
        }
        let item: ItemWire = response.json().await?;
        Ok(Some(item.into()))
    }

    async fn get_products_by_category(
        &self,
        category: impl AsRef<str> + Send + Sync,
    ) -> Result<Vec<Product>, CatalogClientError> {
        let category = category.as_ref();
        depage_stream(|page| self.fetch_category_page(category, page, RESPONSE_PAGE_SIZE))
            .map_ok(Product::from)
            .try_collect()
            .await
    }

    async fn search_products(
        &self,
        term: impl AsRef<str> + Send + Sync,
    ) -> Result<Vec<Product>, CatalogClientError> {
        // The wire contract has no search endpoint; filter the depaged set.
        let term = term.as_ref();
        let products = self.get_products().await?;
        Ok(products
            .into_iter()
            .filter(|product| product.matches_term(term))
            .collect())
    }

    async fn get_products_page(
        &self,
        request: &PageRequest,
    ) -> Result<PagedResponse<Product>, CatalogClientError> {
        // The wire contract carries no filter or sort parameters. A plain
        // request maps to one endpoint page; a filtered or sorted request
        // depages the full set and slices locally so the metadata describes
        // the filtered set, matching the mock sources.
        if request.filters.is_none() && request.sort.is_none() {
            let envelope = self
                .fetch_items_page(request.page_number, request.page_size)
                .await?;
            return Ok(envelope.into());
        }
        let products = self.get_products().await?;
        Ok(request.paginate(products))
    }
}

/// Stream every entity of a paged endpoint, page by page.
///
/// Stops when a page comes back short or the reported page count is exhausted.
fn depage_stream<T, Fut>(
    fetch: impl Fn(u32) -> Fut,
) -> impl Stream<Item = Result<T, CatalogClientError>>
where
    Fut: Future<Output = Result<PagedEnvelope<T>, CatalogClientError>>,
{
    try_stream! {
        let mut page_number = 0;
        loop {
            let envelope = fetch(page_number).await?;
            let meta = envelope.page_meta_data;
            let items_on_page = envelope.entities.len();

            for item in envelope.entities {
                yield item;
            }

            if items_on_page < meta.page_size as usize {
                break;
            }
            if meta.page_number + 1 >= meta.total_pages {
                break;
            }
            page_number += 1;
        }
    }
}

async fn parse_success<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, CatalogClientError> {
    if !response.status().is_success() {
        return Err(error::from_error_response(response).await);
    }
    Ok(response.json().await?)
}

fn build_http_client() -> Result<reqwest::Client, CatalogClientError> {
    Ok(reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(15))
        .timeout(Duration::from_secs(60))
        .user_agent(concat!("catalog-client/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
