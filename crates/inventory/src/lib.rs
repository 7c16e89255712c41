//! Inventory matching domain module.
//!
//! This crate contains the business rules for finding related parts, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no caching). Callers
//! hand in a slice of catalog items; the infrastructure layer decides where that
//! slice comes from.

pub mod catalog;
pub mod classification;
pub mod item;
pub mod matcher;
pub mod order;
pub mod size;

pub use catalog::{StockSummary, search_by_code};
pub use classification::{ClassificationCode, ClassificationResolver, ClassificationRule, classify};
pub use item::InventoryItem;
pub use matcher::{
    MatchCandidate, MatchTarget, RankingPolicy, RelatedParts, RelatedPartsMatcher, ShortageOrder,
    TargetSummary,
};
pub use order::{OrderCheck, OrderLine, OrderLineOutcome, OrderLineReport, check_order};
pub use size::{SizeSet, extract_sizes, has_size_notation};
