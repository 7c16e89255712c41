use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use partmatch_inventory::InventoryItem;

/// The full catalog as of `captured_at`, valid for `ttl`.
///
/// Shared behind an `Arc`: a match that started on a snapshot keeps reading
/// it even after the cache has moved on to a newer one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSnapshot {
    items: Vec<InventoryItem>,
    captured_at: DateTime<Utc>,
    ttl: TimeDelta,
    pages: u32,
}

impl CatalogSnapshot {
    pub fn new(items: Vec<InventoryItem>, captured_at: DateTime<Utc>, ttl: TimeDelta, pages: u32) -> Self {
        Self {
            items,
            captured_at,
            ttl,
            pages,
        }
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Number of upstream pages the snapshot was assembled from.
    pub fn pages(&self) -> u32 {
        self.pages
    }

    /// `now - captured_at < ttl`.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.captured_at) < self.ttl
    }
}
