use std::time::Duration;

use async_trait::async_trait;

use partmatch_inventory::InventoryItem;

use super::record::PageBody;
use super::source::{CatalogSource, FetchError};
use crate::config::CatalogConfig;

/// Catalog backend speaking the inventory HTTP/JSON API.
///
/// `GET {api_url}?page={n}&per_page={size}` with an optional bearer token.
/// No retries: a failed request is a failed page.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
    item_code_label: String,
}

impl HttpCatalogSource {
    pub fn new(config: &CatalogConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        if config.api_token.is_none() {
            tracing::warn!(api_url = %config.api_url, "no catalog API token configured; requests are unauthenticated");
        }

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            token: config.api_token.clone(),
            item_code_label: config.item_code_label.clone(),
        })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<Vec<InventoryItem>, FetchError> {
        let mut req = self
            .client
            .get(&self.api_url)
            .query(&[("page", page), ("per_page", page_size)]);

        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|e| transport_error(page, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                page,
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        let body: PageBody = resp.json().await.map_err(|e| FetchError::Decode {
            page,
            message: e.to_string(),
        })?;

        Ok(body
            .into_records()
            .into_iter()
            .map(|record| record.into_item(&self.item_code_label))
            .collect())
    }
}

fn transport_error(page: u32, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout { page }
    } else {
        FetchError::Transport {
            page,
            message: err.to_string(),
        }
    }
}
