//! Error handling for catalog operations.
//!
//! Unknown identifiers are not errors anywhere in this crate; adapters return
//! `Ok(None)` (or `Ok(false)` for deletes) instead. No layer below the
//! consumer recovers or retries a failure.

use catalog_api::ErrorBody;
use reqwest::StatusCode;
use thiserror::Error;

/// Common error type for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogClientError {
    /// The advanced mock rejected a write with invalid content.
    #[error("invalid product data: {0}")]
    Validation(String),
    /// A configured fault-injection trial failed the call.
    #[error("simulated failure: {0}")]
    Simulated(String),
    /// Transport-level failure, surfaced unchanged.
    #[error("request failed")]
    Request(#[from] reqwest::Error),
    /// The API answered with a non-2xx status.
    #[error("{status}: {detail}")]
    ErrorResponse { status: StatusCode, detail: String },
    #[error("invalid catalog url")]
    Url(#[from] url::ParseError),
}

/// Turn a non-2xx response into an error, keeping the API's `detail` message
/// when the body parses as the documented error shape.
pub(crate) async fn from_error_response(response: reqwest::Response) -> CatalogClientError {
    let status = response.status();
    let detail = match response.json::<ErrorBody>().await {
        Ok(body) => body.detail,
        // The body may be HTML garbage from a proxy; report the status alone.
        Err(_) => "error body omitted".to_string(),
    };
    CatalogClientError::ErrorResponse { status, detail }
}
