//! Infrastructure layer: catalog sources, snapshot caching, config, and the
//! service facade that ties them to the matching domain.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod service;

pub use cache::{CacheSettings, CatalogSnapshot, Clock, ManualClock, SnapshotCache, StalePolicy, SystemClock};
pub use catalog::{CatalogSource, FetchError, HttpCatalogSource, InMemoryCatalogSource};
pub use config::{CatalogConfig, ConfigError};
pub use service::{CatalogService, ServiceError};
