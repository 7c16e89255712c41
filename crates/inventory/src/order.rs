//! Order check: availability of every line of an order form.
//!
//! Lines come from an external order-intake source as (item code, required
//! quantity) pairs. Each line is reported on its own; an item that is not in
//! the catalog is an ordinary [`OrderLineOutcome::NotRegistered`] outcome.

use serde::{Deserialize, Serialize};

use partmatch_core::{DomainError, DomainResult, ItemCode};

use crate::item::InventoryItem;
use crate::matcher::{MatchTarget, RelatedParts, RelatedPartsMatcher};

/// One requested line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_code: String,
    pub quantity: f64,
}

impl OrderLine {
    pub fn new(item_code: impl Into<String>, quantity: f64) -> Self {
        Self {
            item_code: item_code.into(),
            quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OrderLineOutcome {
    /// Catalogued and classified; related parts resolved.
    Registered {
        item: InventoryItem,
        is_shortage: bool,
        warning: bool,
        related: RelatedParts,
    },
    /// Catalogued, but no classification code could be derived.
    Unclassified {
        item: InventoryItem,
        is_shortage: bool,
        warning: bool,
    },
    /// Not present in the catalog snapshot.
    NotRegistered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineReport {
    pub item_code: ItemCode,
    pub required_quantity: f64,
    #[serde(flatten)]
    pub outcome: OrderLineOutcome,
}

impl OrderLineReport {
    pub fn is_registered(&self) -> bool {
        !matches!(self.outcome, OrderLineOutcome::NotRegistered)
    }

    /// The ordered item itself is short (zero stock or below the required quantity).
    pub fn needs_attention(&self) -> bool {
        match &self.outcome {
            OrderLineOutcome::Registered { is_shortage, warning, .. }
            | OrderLineOutcome::Unclassified { is_shortage, warning, .. } => *is_shortage || *warning,
            OrderLineOutcome::NotRegistered => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCheck {
    pub lines: Vec<OrderLineReport>,
    pub registered_count: usize,
    pub not_registered_count: usize,
    pub attention_count: usize,
}

/// Check every line against `items`, in input order.
///
/// Fails only on malformed lines (blank code, negative or non-finite
/// quantity); everything else becomes a per-line outcome.
pub fn check_order(
    items: &[InventoryItem],
    lines: &[OrderLine],
    matcher: &RelatedPartsMatcher,
) -> DomainResult<OrderCheck> {
    if lines.is_empty() {
        return Err(DomainError::malformed("order has no lines"));
    }

    let mut reports = Vec::with_capacity(lines.len());
    for line in lines {
        let item_code = ItemCode::new(&line.item_code)?;
        if !line.quantity.is_finite() || line.quantity < 0.0 {
            return Err(DomainError::malformed(format!(
                "quantity for {item_code} must be a non-negative number"
            )));
        }

        let outcome = match items.iter().find(|item| item.has_code(&item_code)) {
            None => OrderLineOutcome::NotRegistered,
            Some(item) => {
                let is_shortage = item.is_shortage();
                let warning = item.is_below(line.quantity);
                let target = MatchTarget::item(item_code.clone()).with_required_quantity(line.quantity);
                match matcher.find_related(items, &target) {
                    Ok(related) => OrderLineOutcome::Registered {
                        item: item.clone(),
                        is_shortage,
                        warning,
                        related,
                    },
                    Err(DomainError::ClassificationUnresolved(_)) => OrderLineOutcome::Unclassified {
                        item: item.clone(),
                        is_shortage,
                        warning,
                    },
                    Err(err) => return Err(err),
                }
            }
        };

        reports.push(OrderLineReport {
            item_code,
            required_quantity: line.quantity,
            outcome,
        });
    }

    let registered_count = reports.iter().filter(|r| r.is_registered()).count();
    Ok(OrderCheck {
        registered_count,
        not_registered_count: reports.len() - registered_count,
        attention_count: reports.iter().filter(|r| r.needs_attention()).count(),
        lines: reports,
    })
}
