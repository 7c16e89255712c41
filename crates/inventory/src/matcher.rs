use core::cmp::Ordering;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use partmatch_core::{DomainError, DomainResult, ItemCode};

use crate::classification::{ClassificationCode, ClassificationResolver};
use crate::item::InventoryItem;
use crate::size::{SizeSet, extract_sizes};

/// What to find related parts for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchTarget {
    /// A catalogued item: name and classification come from the snapshot.
    Item {
        item_code: ItemCode,
        #[serde(default)]
        required_quantity: Option<f64>,
    },
    /// An explicit family plus the free-text name carrying the required sizes.
    Family {
        classification: ClassificationCode,
        name: String,
        #[serde(default)]
        required_quantity: Option<f64>,
    },
}

impl MatchTarget {
    pub fn item(item_code: ItemCode) -> Self {
        Self::Item {
            item_code,
            required_quantity: None,
        }
    }

    pub fn family(classification: ClassificationCode, name: impl Into<String>) -> Self {
        Self::Family {
            classification,
            name: name.into(),
            required_quantity: None,
        }
    }

    pub fn with_required_quantity(mut self, quantity: f64) -> Self {
        match &mut self {
            Self::Item { required_quantity, .. } | Self::Family { required_quantity, .. } => {
                *required_quantity = Some(quantity);
            }
        }
        self
    }

    pub fn required_quantity(&self) -> Option<f64> {
        match self {
            Self::Item { required_quantity, .. } | Self::Family { required_quantity, .. } => {
                *required_quantity
            }
        }
    }
}

/// Where zero-stock items go in the ranked list.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortageOrder {
    /// Zero-quantity items first (what needs re-ordering is seen first).
    #[default]
    ShortageFirst,
    /// Items in stock first.
    InStockFirst,
}

impl FromStr for ShortageOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shortage_first" => Ok(Self::ShortageFirst),
            "in_stock_first" => Ok(Self::InStockFirst),
            other => Err(DomainError::malformed(format!(
                "unknown shortage order {other:?} (expected shortage_first or in_stock_first)"
            ))),
        }
    }
}

/// Ordering of matched candidates.
///
/// Keys, in order: shortage group (per [`ShortageOrder`]), common parts before
/// size-matched parts, item code ascending.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingPolicy {
    pub shortage_order: ShortageOrder,
}

impl RankingPolicy {
    pub fn new(shortage_order: ShortageOrder) -> Self {
        Self { shortage_order }
    }

    pub fn compare(&self, a: &MatchCandidate, b: &MatchCandidate) -> Ordering {
        let shortage = match self.shortage_order {
            ShortageOrder::ShortageFirst => b.is_shortage.cmp(&a.is_shortage),
            ShortageOrder::InStockFirst => a.is_shortage.cmp(&b.is_shortage),
        };
        shortage
            .then_with(|| b.is_common_part.cmp(&a.is_common_part))
            .then_with(|| a.item.code_str().cmp(b.item.code_str()))
    }
}

/// One related part with its derived flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub item: InventoryItem,
    pub sizes: SizeSet,
    /// No size notation: compatible with any size.
    pub is_common_part: bool,
    /// Shares at least one size with the target.
    pub is_size_match: bool,
    /// Quantity is zero.
    pub is_shortage: bool,
    /// Quantity is below the caller-supplied required quantity.
    ///
    /// Always `false` when no required quantity was given.
    pub warning: bool,
}

/// The resolved target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSummary {
    pub item_code: Option<ItemCode>,
    pub name: String,
    pub classification: ClassificationCode,
    pub required_sizes: SizeSet,
    pub required_quantity: Option<f64>,
}

/// Ranked related parts for one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedParts {
    pub target: TargetSummary,
    /// Included candidates in rank order.
    pub parts: Vec<MatchCandidate>,
    /// Same-family items whose sizes do not fit the target.
    pub excluded: Vec<InventoryItem>,
}

impl RelatedParts {
    pub fn common_parts(&self) -> impl Iterator<Item = &MatchCandidate> {
        self.parts.iter().filter(|c| c.is_common_part)
    }

    pub fn size_matched_parts(&self) -> impl Iterator<Item = &MatchCandidate> {
        self.parts.iter().filter(|c| c.is_size_match)
    }

    pub fn shortage_parts(&self) -> impl Iterator<Item = &MatchCandidate> {
        self.parts.iter().filter(|c| c.is_shortage)
    }

    pub fn in_stock_parts(&self) -> impl Iterator<Item = &MatchCandidate> {
        self.parts.iter().filter(|c| !c.is_shortage)
    }

    pub fn shortage_count(&self) -> usize {
        self.shortage_parts().count()
    }
}

/// Finds the parts related to a target within one catalog snapshot.
#[derive(Debug, Copy, Clone, Default)]
pub struct RelatedPartsMatcher {
    resolver: ClassificationResolver,
    ranking: RankingPolicy,
}

impl RelatedPartsMatcher {
    pub fn new(resolver: ClassificationResolver, ranking: RankingPolicy) -> Self {
        Self { resolver, ranking }
    }

    pub fn resolver(&self) -> &ClassificationResolver {
        &self.resolver
    }

    pub fn ranking(&self) -> &RankingPolicy {
        &self.ranking
    }

    pub fn find_related(&self, items: &[InventoryItem], target: &MatchTarget) -> DomainResult<RelatedParts> {
        let target = self.resolve_target(items, target)?;

        let mut parts = Vec::new();
        let mut excluded = Vec::new();

        for item in items {
            let Some(code) = &item.item_code else {
                continue;
            };
            if target.item_code.as_ref() == Some(code) {
                continue;
            }
            if self.resolver.classify(code.as_str()).as_ref() != Some(&target.classification) {
                continue;
            }

            let sizes = extract_sizes(&item.name);
            let is_common_part = sizes.is_empty();
            let is_size_match = !is_common_part && sizes.intersects(&target.required_sizes);
            if !is_common_part && !is_size_match {
                excluded.push(item.clone());
                continue;
            }

            parts.push(MatchCandidate {
                item: item.clone(),
                sizes,
                is_common_part,
                is_size_match,
                is_shortage: item.is_shortage(),
                warning: target.required_quantity.is_some_and(|required| item.is_below(required)),
            });
        }

        parts.sort_by(|a, b| self.ranking.compare(a, b));

        Ok(RelatedParts {
            target,
            parts,
            excluded,
        })
    }

    fn resolve_target(&self, items: &[InventoryItem], target: &MatchTarget) -> DomainResult<TargetSummary> {
        if let Some(required) = target.required_quantity() {
            if !required.is_finite() || required < 0.0 {
                return Err(DomainError::malformed("required quantity must be a non-negative number"));
            }
        }

        match target {
            MatchTarget::Item {
                item_code,
                required_quantity,
            } => {
                let item = items
                    .iter()
                    .find(|item| item.has_code(item_code))
                    .ok_or_else(|| DomainError::not_found(item_code.as_str()))?;
                let classification = self
                    .resolver
                    .classify(item_code.as_str())
                    .ok_or_else(|| DomainError::unresolved(item_code.as_str()))?;
                Ok(TargetSummary {
                    item_code: Some(item_code.clone()),
                    name: item.name.clone(),
                    classification,
                    required_sizes: extract_sizes(&item.name),
                    required_quantity: *required_quantity,
                })
            }
            MatchTarget::Family {
                classification,
                name,
                required_quantity,
            } => Ok(TargetSummary {
                item_code: None,
                name: name.clone(),
                classification: classification.clone(),
                required_sizes: extract_sizes(name),
                required_quantity: *required_quantity,
            }),
        }
    }
}
