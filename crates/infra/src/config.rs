//! Configuration loading and representation.
//!
//! Everything is read from environment variables (see [`CatalogConfig::from_env`]);
//! unset variables keep their defaults, set-but-invalid ones are an error.

use core::str::FromStr;
use std::time::Duration;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use partmatch_inventory::{
    ClassificationResolver, ClassificationRule, RankingPolicy, RelatedPartsMatcher, ShortageOrder,
};

use crate::cache::{CacheSettings, StalePolicy};

pub const DEFAULT_API_URL: &str = "https://web.zaico.co.jp/api/v1/inventories";
pub const DEFAULT_ITEM_CODE_LABEL: &str = "品番";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub ttl_secs: u64,
    pub page_size: u32,
    pub max_pages: u32,
    pub http_timeout_secs: u64,
    pub item_code_label: String,
    pub stale_policy: StalePolicy,
    pub classification_rule: ClassificationRule,
    pub shortage_order: ShortageOrder,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            ttl_secs: 300,
            page_size: 100,
            max_pages: 20,
            http_timeout_secs: 10,
            item_code_label: DEFAULT_ITEM_CODE_LABEL.to_string(),
            stale_policy: StalePolicy::default(),
            classification_rule: ClassificationRule::default(),
            shortage_order: ShortageOrder::default(),
        }
    }
}

impl CatalogConfig {
    /// Load from the process environment.
    ///
    /// | variable | default |
    /// |---|---|
    /// | `CATALOG_API_URL` | [`DEFAULT_API_URL`] |
    /// | `CATALOG_API_TOKEN` | unset |
    /// | `CATALOG_TTL_SECS` | 300 |
    /// | `CATALOG_PAGE_SIZE` | 100 |
    /// | `CATALOG_MAX_PAGES` | 20 |
    /// | `CATALOG_HTTP_TIMEOUT_SECS` | 10 |
    /// | `CATALOG_ITEM_CODE_LABEL` | [`DEFAULT_ITEM_CODE_LABEL`] |
    /// | `CATALOG_STALE_POLICY` | `serve_stale` |
    /// | `CLASSIFICATION_RULE` | `digit_prefix_then_hyphen_segment` |
    /// | `SHORTAGE_ORDER` | `shortage_first` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup (tests pass a map instead of the env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = Self::default();

        if let Some(url) = get("CATALOG_API_URL") {
            cfg.api_url = url;
        }
        cfg.api_token = get("CATALOG_API_TOKEN");
        if let Some(label) = get("CATALOG_ITEM_CODE_LABEL") {
            cfg.item_code_label = label;
        }

        cfg.ttl_secs = parse_or("CATALOG_TTL_SECS", get("CATALOG_TTL_SECS"), cfg.ttl_secs)?;
        cfg.page_size = parse_or("CATALOG_PAGE_SIZE", get("CATALOG_PAGE_SIZE"), cfg.page_size)?;
        cfg.max_pages = parse_or("CATALOG_MAX_PAGES", get("CATALOG_MAX_PAGES"), cfg.max_pages)?;
        cfg.http_timeout_secs = parse_or(
            "CATALOG_HTTP_TIMEOUT_SECS",
            get("CATALOG_HTTP_TIMEOUT_SECS"),
            cfg.http_timeout_secs,
        )?;
        cfg.stale_policy = parse_or("CATALOG_STALE_POLICY", get("CATALOG_STALE_POLICY"), cfg.stale_policy)?;
        cfg.classification_rule =
            parse_or("CLASSIFICATION_RULE", get("CLASSIFICATION_RULE"), cfg.classification_rule)?;
        cfg.shortage_order = parse_or("SHORTAGE_ORDER", get("SHORTAGE_ORDER"), cfg.shortage_order)?;

        for (key, value) in [
            ("CATALOG_PAGE_SIZE", u64::from(cfg.page_size)),
            ("CATALOG_MAX_PAGES", u64::from(cfg.max_pages)),
            ("CATALOG_HTTP_TIMEOUT_SECS", cfg.http_timeout_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    key,
                    value: value.to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
        }

        Ok(cfg)
    }

    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            ttl: i64::try_from(self.ttl_secs)
                .ok()
                .and_then(TimeDelta::try_seconds)
                .unwrap_or(TimeDelta::MAX),
            page_size: self.page_size,
            max_pages: self.max_pages,
            fetch_timeout: Duration::from_secs(self.http_timeout_secs),
            stale_policy: self.stale_policy,
        }
    }

    pub fn matcher(&self) -> RelatedPartsMatcher {
        RelatedPartsMatcher::new(
            ClassificationResolver::new(self.classification_rule),
            RankingPolicy::new(self.shortage_order),
        )
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}
