//! Wire types for the product catalog REST API.
//!
//! These structs mirror the JSON shapes exchanged with the `/api/items`
//! endpoints verbatim:
//!
//! - `GET {base}/api/items?page={n}&pageSize={m}` -> [`PagedEnvelope<ItemWire>`]
//! - `GET {base}/api/items/{id}` -> [`ItemWire`]
//! - `GET {base}/api/items/{category}` -> [`PagedEnvelope<ItemWire>`]
//!
//! Field names are camelCase on the wire and the status values are the
//! backend's Italian labels. Domain conversions live in `catalog-client`;
//! nothing here validates content beyond what serde enforces.

use serde::{Deserialize, Serialize};

/// Availability status as serialized by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemStatus {
    #[serde(rename = "DISPONIBILE")]
    Available,
    #[serde(rename = "NON_DISPONIBILE")]
    Unavailable,
    #[serde(rename = "ESAURITO")]
    OutOfStock,
}

/// A single catalog item as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemWire {
    pub id: String,
    pub name: String,
    pub description: String,
    pub quantity: u32,
    pub status: ItemStatus,
    pub unit_price: f64,
    pub category: String,
    pub image_url: String,
}

/// Creation payload: an [`ItemWire`] without its server-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCreate {
    pub name: String,
    pub description: String,
    pub quantity: u32,
    pub status: ItemStatus,
    pub unit_price: f64,
    pub category: String,
    pub image_url: String,
}

/// Pagination block attached to every collection response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetaDataWire {
    pub page_number: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

/// Paginated collection envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedEnvelope<T> {
    pub entities: Vec<T>,
    pub page_meta_data: PageMetaDataWire,
}

/// Body the API attaches to non-2xx responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
