use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use partmatch_infra::CatalogSnapshot;
use partmatch_inventory::{
    InventoryItem, MatchCandidate, OrderLine, RelatedParts, TargetSummary,
};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderCheckRequest {
    pub lines: Vec<OrderLine>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub found: bool,
    pub count: usize,
    pub items: Vec<InventoryItem>,
}

impl SearchResponse {
    pub fn new(query: impl Into<String>, items: Vec<InventoryItem>) -> Self {
        Self {
            query: query.into(),
            found: !items.is_empty(),
            count: items.len(),
            items,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RelatedPartsResponse {
    pub target: TargetSummary,
    pub common_count: usize,
    pub size_matched_count: usize,
    pub shortage_count: usize,
    pub parts: Vec<MatchCandidate>,
    /// Subsets of `parts`, each in rank order.
    pub shortage_parts: Vec<MatchCandidate>,
    pub in_stock_parts: Vec<MatchCandidate>,
    pub excluded: Vec<InventoryItem>,
}

impl From<RelatedParts> for RelatedPartsResponse {
    fn from(related: RelatedParts) -> Self {
        Self {
            common_count: related.common_parts().count(),
            size_matched_count: related.size_matched_parts().count(),
            shortage_count: related.shortage_count(),
            shortage_parts: related.shortage_parts().cloned().collect(),
            in_stock_parts: related.in_stock_parts().cloned().collect(),
            target: related.target,
            parts: related.parts,
            excluded: related.excluded,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub items: usize,
    pub pages: u32,
    pub captured_at: DateTime<Utc>,
    pub ttl_secs: i64,
}

impl From<&CatalogSnapshot> for RefreshResponse {
    fn from(snapshot: &CatalogSnapshot) -> Self {
        Self {
            items: snapshot.len(),
            pages: snapshot.pages(),
            captured_at: snapshot.captured_at(),
            ttl_secs: snapshot.ttl().num_seconds(),
        }
    }
}
