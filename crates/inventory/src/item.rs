use serde::{Deserialize, Serialize};

use partmatch_core::ItemCode;

/// A catalogued inventory item as seen in one catalog snapshot.
///
/// Read-model style: plain data, immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Part/item code. `None` means the item is not registered under a code.
    pub item_code: Option<ItemCode>,
    /// Display name (free text, carries the size notation if any).
    pub name: String,
    /// Current stock. Non-negative, fractional quantities allowed.
    pub quantity: f64,
    /// Unit label (e.g. "個", "pcs", "m").
    pub unit: String,
    /// Raw category field as reported by the catalog.
    pub category: String,
    /// Last-update timestamp, kept opaque.
    pub updated_at: Option<String>,
}

impl InventoryItem {
    pub fn new(item_code: Option<ItemCode>, name: impl Into<String>, quantity: f64) -> Self {
        Self {
            item_code,
            name: name.into(),
            quantity,
            unit: String::new(),
            category: String::new(),
            updated_at: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_updated_at(mut self, updated_at: impl Into<String>) -> Self {
        self.updated_at = Some(updated_at.into());
        self
    }

    /// Item code as a string slice; empty for unregistered items.
    pub fn code_str(&self) -> &str {
        self.item_code.as_ref().map(ItemCode::as_str).unwrap_or("")
    }

    pub fn has_code(&self, code: &ItemCode) -> bool {
        self.item_code.as_ref() == Some(code)
    }

    /// Out of stock: quantity is exactly zero (or below, for bad upstream data).
    pub fn is_shortage(&self) -> bool {
        self.quantity <= 0.0
    }

    /// Strictly less stock than `required`.
    pub fn is_below(&self, required: f64) -> bool {
        self.quantity < required
    }
}
