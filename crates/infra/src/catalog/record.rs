//! Upstream wire records.
//!
//! The catalog API reports items with a handful of fixed fields plus a
//! repeated name/value attribute list. Deployments keep the part code in that
//! list under a fixed label; [`CatalogRecord::identifier`] is the one place
//! that knows how to find it.

use serde::{Deserialize, Deserializer};

use partmatch_core::ItemCode;
use partmatch_inventory::InventoryItem;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordAttribute {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "quantity")]
    pub quantity: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub item_code: Option<String>,
    #[serde(default)]
    pub optional_attributes: Vec<RecordAttribute>,
}

impl CatalogRecord {
    /// Item code: the attribute labelled `label`, falling back to the direct
    /// `item_code` field. Blank values count as absent.
    pub fn identifier(&self, label: &str) -> Option<ItemCode> {
        self.optional_attributes
            .iter()
            .find(|attr| attr.name.trim() == label)
            .and_then(|attr| attr.value.as_deref())
            .and_then(|value| ItemCode::new(value).ok())
            .or_else(|| self.item_code.as_deref().and_then(|value| ItemCode::new(value).ok()))
    }

    pub fn into_item(self, label: &str) -> InventoryItem {
        InventoryItem {
            item_code: self.identifier(label),
            name: self.title.unwrap_or_default(),
            quantity: self.quantity,
            unit: self.unit.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            updated_at: self.updated_at,
        }
    }
}

/// A page of records, either a bare array or wrapped as `{"inventories": [...]}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PageBody {
    Bare(Vec<CatalogRecord>),
    Wrapped { inventories: Vec<CatalogRecord> },
}

impl PageBody {
    pub fn into_records(self) -> Vec<CatalogRecord> {
        match self {
            Self::Bare(records) => records,
            Self::Wrapped { inventories } => inventories,
        }
    }
}

/// Quantity arrives as a number, a numeric string, or null.
fn quantity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(Raw::Number(n)) => Ok(n),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(0.0),
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid quantity {s:?}"))),
    }
}
