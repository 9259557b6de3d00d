//! Client configuration.
//!
//! The only required value is the upstream base URL; the trusted origin is
//! derived from it. Everything can come from the environment:
//!
//! | Variable             | Field        |
//! |----------------------|--------------|
//! | `CATALOG_BASE_URL`   | `base_url`   |
//! | `CATALOG_TIMEOUT_MS` | `timeout_ms` |
//! | `CATALOG_USER_AGENT` | `user_agent` |

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://ghibliapi.vercel.app";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL of the upstream API. Its origin is the only one fetched from.
    pub base_url: String,
    /// Per-request timeout, enforced by the transport.
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: concat!("catalog-core/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl CatalogConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Defaults overridden by whatever `CATALOG_*` variables are set.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) but reading through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(base_url) = lookup("CATALOG_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url;
        }
        if let Some(raw) = lookup("CATALOG_TIMEOUT_MS") {
            config.timeout_ms = raw.trim().parse().map_err(|_| {
                ApiError::InvalidConfig(format!("CATALOG_TIMEOUT_MS is not a number: {raw:?}"))
            })?;
        }
        if let Some(user_agent) = lookup("CATALOG_USER_AGENT").filter(|v| !v.trim().is_empty()) {
            config.user_agent = user_agent;
        }
        if config.timeout_ms == 0 {
            return Err(ApiError::InvalidConfig(
                "CATALOG_TIMEOUT_MS must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }
}
