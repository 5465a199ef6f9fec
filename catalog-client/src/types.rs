//! Domain model for catalog operations.
//!
//! These types wrap the wire shapes from `catalog-api` with richer semantics:
//! derived pagination accessors, filter matching, and sort application. The
//! `From` impls at the bottom are the response mapper: field-for-field copies
//! with no validation, since the wire contract is a trust boundary.

use catalog_api::{ItemWire, PageMetaDataWire, PagedEnvelope};
use serde::{Deserialize, Serialize};

pub use catalog_api::ItemCreate as NewProduct;
pub use catalog_api::ItemStatus as ProductStatus;

pub const DEFAULT_PAGE_NUMBER: u32 = 0;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A catalog product.
///
/// Immutable once constructed: adapters that "update" a record build a new
/// instance and substitute it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub quantity: u32,
    pub status: ProductStatus,
    pub unit_price: f64,
    pub category: String,
    pub image_url: String,
}

impl Product {
    /// A product can be sold only when it is marked available and stocked.
    pub fn is_available(&self) -> bool {
        self.status == ProductStatus::Available && self.quantity > 0
    }

    /// Case-insensitive substring match on name or description.
    pub fn matches_term(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}

/// A partial update to a product; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<u32>,
    pub status: Option<ProductStatus>,
    pub unit_price: Option<f64>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

impl ProductUpdate {
    /// Build the replacement record for `product` with this update applied.
    pub fn apply_to(&self, product: &Product) -> Product {
        Product {
            id: product.id.clone(),
            name: self.name.clone().unwrap_or_else(|| product.name.clone()),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| product.description.clone()),
            quantity: self.quantity.unwrap_or(product.quantity),
            status: self.status.unwrap_or(product.status),
            unit_price: self.unit_price.unwrap_or(product.unit_price),
            category: self
                .category
                .clone()
                .unwrap_or_else(|| product.category.clone()),
            image_url: self
                .image_url
                .clone()
                .unwrap_or_else(|| product.image_url.clone()),
        }
    }
}

/// Pagination metadata, created fresh per query response and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetaData {
    pub page_number: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl PageMetaData {
    pub fn new(page_number: u32, page_size: u32, total_elements: u64, total_pages: u32) -> Self {
        Self {
            page_number,
            page_size,
            total_elements,
            total_pages,
        }
    }

    /// Metadata for a page over `total_elements` items, deriving the page count.
    pub fn for_total(page_number: u32, page_size: u32, total_elements: u64) -> Self {
        let total_pages = total_elements.div_ceil(page_size.max(1) as u64) as u32;
        Self::new(page_number, page_size, total_elements, total_pages)
    }

    pub fn is_first_page(&self) -> bool {
        self.page_number == 0
    }

    pub fn is_last_page(&self) -> bool {
        self.page_number + 1 >= self.total_pages
    }

    pub fn has_next_page(&self) -> bool {
        self.page_number + 1 < self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.page_number > 0
    }

    /// 1-based ordinal of the first element on this page.
    pub fn start_element(&self) -> u64 {
        self.page_number as u64 * self.page_size as u64 + 1
    }

    /// 1-based ordinal of the last element on this page, clamped to the total.
    pub fn end_element(&self) -> u64 {
        let end = (self.page_number as u64 + 1) * self.page_size as u64;
        end.min(self.total_elements)
    }
}

/// An ordered page of entities paired with its [`PageMetaData`].
///
/// Whether `entities.len()` agrees with the metadata is up to the backend;
/// nothing here enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub entities: Vec<T>,
    pub page_meta_data: PageMetaData,
}

impl<T> PagedResponse<T> {
    pub fn new(entities: Vec<T>, page_meta_data: PageMetaData) -> Self {
        Self {
            entities,
            page_meta_data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn number_of_elements(&self) -> usize {
        self.entities.len()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entities.get(index)
    }

    /// Map the entities, keeping the metadata.
    pub fn map<U>(self, mapper: impl FnMut(T) -> U) -> PagedResponse<U> {
        PagedResponse {
            entities: self.entities.into_iter().map(mapper).collect(),
            page_meta_data: self.page_meta_data,
        }
    }
}

/// Field-level filters for an intended query. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<ProductStatus>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_quantity: Option<u32>,
    pub max_quantity: Option<u32>,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl SearchFilters {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(name) = &self.name {
            if !contains_ignore_case(&product.name, name) {
                return false;
            }
        }
        if let Some(description) = &self.description {
            if !contains_ignore_case(&product.description, description) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !product.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if product.status != status {
                return false;
            }
        }
        if let Some(min_price) = self.min_price {
            if product.unit_price < min_price {
                return false;
            }
        }
        if let Some(max_price) = self.max_price {
            if product.unit_price > max_price {
                return false;
            }
        }
        if let Some(min_quantity) = self.min_quantity {
            if product.quantity < min_quantity {
                return false;
            }
        }
        if let Some(max_quantity) = self.max_quantity {
            if product.quantity > max_quantity {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    UnitPrice,
    Quantity,
    Status,
    Category,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOptions {
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl SortOptions {
    pub fn new(sort_by: SortField, sort_order: SortOrder) -> Self {
        Self {
            sort_by,
            sort_order,
        }
    }

    pub fn ascending(sort_by: SortField) -> Self {
        Self::new(sort_by, SortOrder::Asc)
    }

    pub fn descending(sort_by: SortField) -> Self {
        Self::new(sort_by, SortOrder::Desc)
    }

    /// Sort `products` in place according to these options.
    pub fn apply(&self, products: &mut [Product]) {
        products.sort_by(|a, b| {
            let ordering = match self.sort_by {
                SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                SortField::UnitPrice => a.unit_price.total_cmp(&b.unit_price),
                SortField::Quantity => a.quantity.cmp(&b.quantity),
                SortField::Status => (a.status as u8).cmp(&(b.status as u8)),
                SortField::Category => a.category.to_lowercase().cmp(&b.category.to_lowercase()),
            };
            match self.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }
}

/// An immutable description of an intended query: page position plus optional
/// filters and sort. Navigation methods return new instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page_number: u32,
    pub page_size: u32,
    pub filters: Option<SearchFilters>,
    pub sort: Option<SortOptions>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::of(DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE)
    }
}

impl PageRequest {
    pub fn of(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number,
            page_size,
            filters: None,
            sort: None,
        }
    }

    pub fn with_filters(self, filters: SearchFilters) -> Self {
        Self {
            filters: Some(filters),
            ..self
        }
    }

    pub fn with_sort(self, sort: SortOptions) -> Self {
        Self {
            sort: Some(sort),
            ..self
        }
    }

    pub fn next(&self) -> Self {
        Self {
            page_number: self.page_number + 1,
            ..self.clone()
        }
    }

    pub fn previous(&self) -> Self {
        Self {
            page_number: self.page_number.saturating_sub(1),
            ..self.clone()
        }
    }

    pub fn first(&self) -> Self {
        Self {
            page_number: 0,
            ..self.clone()
        }
    }

    /// Apply this request to a full product set: filter, sort, then slice out
    /// one page. The metadata describes the filtered set, not the input.
    pub fn paginate(&self, mut products: Vec<Product>) -> PagedResponse<Product> {
        if let Some(filters) = &self.filters {
            products.retain(|product| filters.matches(product));
        }
        if let Some(sort) = &self.sort {
            sort.apply(&mut products);
        }
        let total_elements = products.len() as u64;
        let meta = PageMetaData::for_total(self.page_number, self.page_size, total_elements);
        let start = self.page_number as usize * self.page_size.max(1) as usize;
        let entities = if start >= products.len() {
            Vec::new()
        } else {
            let end = (start + self.page_size as usize).min(products.len());
            products[start..end].to_vec()
        };
        PagedResponse::new(entities, meta)
    }
}

// ---------------------------------------------------------------------------
// Response mapping
// ---------------------------------------------------------------------------

impl From<ItemWire> for Product {
    fn from(item: ItemWire) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            quantity: item.quantity,
            status: item.status,
            unit_price: item.unit_price,
            category: item.category,
            image_url: item.image_url,
        }
    }
}

impl From<&Product> for NewProduct {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            quantity: product.quantity,
            status: product.status,
            unit_price: product.unit_price,
            category: product.category.clone(),
            image_url: product.image_url.clone(),
        }
    }
}

impl Product {
    /// Complete a creation payload with its server-assigned id.
    pub fn from_new(new: NewProduct, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: new.name,
            description: new.description,
            quantity: new.quantity,
            status: new.status,
            unit_price: new.unit_price,
            category: new.category,
            image_url: new.image_url,
        }
    }
}

impl From<PageMetaDataWire> for PageMetaData {
    fn from(meta: PageMetaDataWire) -> Self {
        Self {
            page_number: meta.page_number,
            page_size: meta.page_size,
            total_elements: meta.total_elements,
            total_pages: meta.total_pages,
        }
    }
}

impl From<PagedEnvelope<ItemWire>> for PagedResponse<Product> {
    fn from(envelope: PagedEnvelope<ItemWire>) -> Self {
        Self {
            entities: envelope.entities.into_iter().map(Product::from).collect(),
            page_meta_data: envelope.page_meta_data.into(),
        }
    }
}
