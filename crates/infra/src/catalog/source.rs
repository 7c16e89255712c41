use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use partmatch_inventory::InventoryItem;

/// Upstream catalog failure. Carries the upstream diagnostic verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("catalog page {page} timed out")]
    Timeout { page: u32 },

    #[error("catalog page {page} request failed: {message}")]
    Transport { page: u32, message: String },

    #[error("catalog page {page} returned HTTP {status}: {body}")]
    Status { page: u32, status: u16, body: String },

    #[error("catalog page {page} could not be decoded: {message}")]
    Decode { page: u32, message: String },

    #[error("catalog client misconfigured: {0}")]
    Client(String),
}

/// Paged access to the full remote catalog.
///
/// Pages are 1-based. A page shorter than `page_size` (including an empty
/// one) is the last page.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<Vec<InventoryItem>, FetchError>;
}

#[async_trait]
impl<S> CatalogSource for Arc<S>
where
    S: CatalogSource + ?Sized,
{
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<Vec<InventoryItem>, FetchError> {
        (**self).fetch_page(page, page_size).await
    }
}
