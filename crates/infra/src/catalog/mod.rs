//! Remote catalog access.
//!
//! - `source.rs`: the paging contract every catalog backend implements
//! - `record.rs`: upstream wire records and their mapping to domain items
//! - `http.rs`: HTTP/JSON backend (bearer-token authenticated)
//! - `in_memory.rs`: fixed in-process catalog for tests/dev

pub mod http;
pub mod in_memory;
pub mod record;
pub mod source;

pub use http::HttpCatalogSource;
pub use in_memory::InMemoryCatalogSource;
pub use record::{CatalogRecord, PageBody, RecordAttribute};
pub use source::{CatalogSource, FetchError};
