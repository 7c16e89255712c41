use std::sync::Arc;

use partmatch_infra::{
    CatalogConfig, CatalogService, CatalogSource, FetchError, HttpCatalogSource, SnapshotCache,
};

pub type DynCatalogSource = Arc<dyn CatalogSource>;

/// Everything the handlers need, shared behind an `Arc`.
pub struct AppServices {
    catalog: CatalogService<DynCatalogSource>,
}

impl AppServices {
    /// Wire an arbitrary catalog source with the cache and matcher from `config`.
    pub fn new(source: DynCatalogSource, config: &CatalogConfig) -> Self {
        let cache = SnapshotCache::new(source, config.cache_settings());
        Self {
            catalog: CatalogService::new(cache, config.matcher()),
        }
    }

    /// Production wiring: the HTTP catalog client described by `config`.
    pub fn from_config(config: CatalogConfig) -> Result<Self, FetchError> {
        let source: DynCatalogSource = Arc::new(HttpCatalogSource::new(&config)?);
        tracing::info!(
            api_url = %config.api_url,
            ttl_secs = config.ttl_secs,
            page_size = config.page_size,
            max_pages = config.max_pages,
            stale_policy = config.stale_policy.as_str(),
            classification_rule = config.classification_rule.as_str(),
            "catalog service configured"
        );
        Ok(Self::new(source, &config))
    }

    pub fn catalog(&self) -> &CatalogService<DynCatalogSource> {
        &self.catalog
    }
}
