use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use partmatch_inventory::InventoryItem;

use super::source::{CatalogSource, FetchError};

/// In-memory catalog served in pages.
///
/// Intended for tests/dev. Counts page requests so callers can assert on
/// upstream traffic.
#[derive(Debug, Default)]
pub struct InMemoryCatalogSource {
    items: RwLock<Vec<InventoryItem>>,
    page_requests: AtomicUsize,
}

impl InMemoryCatalogSource {
    pub fn new(items: Vec<InventoryItem>) -> Self {
        Self {
            items: RwLock::new(items),
            page_requests: AtomicUsize::new(0),
        }
    }

    /// Swap the catalog contents (visible on the next page request).
    pub fn replace(&self, items: Vec<InventoryItem>) {
        if let Ok(mut guard) = self.items.write() {
            *guard = items;
        }
    }

    pub fn page_requests(&self) -> usize {
        self.page_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalogSource {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<Vec<InventoryItem>, FetchError> {
        self.page_requests.fetch_add(1, Ordering::SeqCst);

        let items = self
            .items
            .read()
            .map_err(|_| FetchError::Client("in-memory catalog lock poisoned".to_string()))?;

        if page == 0 || page_size == 0 {
            return Ok(vec![]);
        }
        let start = (page as usize - 1).saturating_mul(page_size as usize);
        let end = start.saturating_add(page_size as usize).min(items.len());
        if start >= items.len() {
            return Ok(vec![]);
        }
        Ok(items[start..end].to_vec())
    }
}
