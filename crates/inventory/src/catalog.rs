//! Whole-catalog queries: stock summary and item-code search.

use serde::{Deserialize, Serialize};

use partmatch_core::{DomainError, DomainResult};

use crate::item::InventoryItem;

/// Stock overview of a catalog snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSummary {
    pub total: usize,
    pub in_stock_count: usize,
    pub out_of_stock_count: usize,
    pub in_stock: Vec<InventoryItem>,
    pub out_of_stock: Vec<InventoryItem>,
}

impl StockSummary {
    /// Split `items` by stock, preserving catalog order within each side.
    pub fn from_items(items: &[InventoryItem]) -> Self {
        let (out_of_stock, in_stock): (Vec<_>, Vec<_>) =
            items.iter().cloned().partition(InventoryItem::is_shortage);
        Self {
            total: items.len(),
            in_stock_count: in_stock.len(),
            out_of_stock_count: out_of_stock.len(),
            in_stock,
            out_of_stock,
        }
    }
}

/// Case-insensitive substring search on item codes.
///
/// A blank query is malformed; no hits is an empty result, not an error.
pub fn search_by_code(items: &[InventoryItem], query: &str) -> DomainResult<Vec<InventoryItem>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(DomainError::malformed("search query cannot be empty"));
    }
    Ok(items
        .iter()
        .filter(|item| item.code_str().to_lowercase().contains(&needle))
        .cloned()
        .collect())
}
