//! Application-facing facade: reads the snapshot, runs the pure domain
//! queries over it, and folds both error layers into [`ServiceError`].

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use partmatch_core::DomainError;
use partmatch_inventory::{
    InventoryItem, MatchTarget, OrderCheck, OrderLine, RelatedParts, RelatedPartsMatcher, StockSummary,
    check_order, search_by_code,
};

use crate::cache::{CatalogSnapshot, SnapshotCache};
use crate::catalog::{CatalogSource, FetchError};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ServiceError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Domain(err) => err.code(),
            Self::Fetch(_) => "fetch_error",
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub struct CatalogService<S> {
    cache: SnapshotCache<S>,
    matcher: RelatedPartsMatcher,
}

impl<S: CatalogSource> CatalogService<S> {
    pub fn new(cache: SnapshotCache<S>, matcher: RelatedPartsMatcher) -> Self {
        Self { cache, matcher }
    }

    pub fn cache(&self) -> &SnapshotCache<S> {
        &self.cache
    }

    pub fn matcher(&self) -> &RelatedPartsMatcher {
        &self.matcher
    }

    pub async fn snapshot(&self) -> ServiceResult<Arc<CatalogSnapshot>> {
        Ok(self.cache.get_snapshot().await?)
    }

    pub async fn stock_summary(&self) -> ServiceResult<StockSummary> {
        let snapshot = self.snapshot().await?;
        Ok(StockSummary::from_items(snapshot.items()))
    }

    pub async fn search(&self, query: &str) -> ServiceResult<Vec<InventoryItem>> {
        let snapshot = self.snapshot().await?;
        let hits = search_by_code(snapshot.items(), query)?;
        info!(query = query.trim(), hits = hits.len(), "inventory.search");
        Ok(hits)
    }

    pub async fn find_related(&self, target: &MatchTarget) -> ServiceResult<RelatedParts> {
        let snapshot = self.snapshot().await?;
        let related = self.matcher.find_related(snapshot.items(), target)?;
        info!(
            classification = %related.target.classification,
            included = related.parts.len(),
            excluded = related.excluded.len(),
            shortage = related.shortage_count(),
            "inventory.related.matched"
        );
        Ok(related)
    }

    pub async fn check_order(&self, lines: &[OrderLine]) -> ServiceResult<OrderCheck> {
        let snapshot = self.snapshot().await?;
        let check = check_order(snapshot.items(), lines, &self.matcher)?;
        info!(
            lines = check.lines.len(),
            registered = check.registered_count,
            not_registered = check.not_registered_count,
            attention = check.attention_count,
            "order.checked"
        );
        Ok(check)
    }

    /// Crawl the catalog again now. A failed crawl is an error even when a
    /// stale snapshot is held.
    pub async fn refresh(&self) -> ServiceResult<Arc<CatalogSnapshot>> {
        Ok(self.cache.refresh_now().await?)
    }
}
