//! Client configuration
//!
//! Loaded from TOML; every key is optional and falls back to the defaults
//! below.
//!
//! ```toml
//! base_url = "http://localhost:5000"
//! page_size = 10
//! search_debounce_ms = 1000
//! notice_ttl_ms = 3000
//! max_retries = 2
//! request_timeout_secs = 30
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Largest page size accepted by [`ClientConfig::validated`].
pub const MAX_PAGE_SIZE: u32 = rental_catalog_api::MAX_PAGE_SIZE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Service address, without trailing slash.
    pub base_url: String,
    /// Rows per list page.
    pub page_size: u32,
    /// Quiescent window before a search text is fetched.
    pub search_debounce_ms: u64,
    /// How long a success notice stays visible.
    pub notice_ttl_ms: u64,
    /// Retries for transient failures on read requests.
    pub max_retries: u32,
    /// Transport-level request timeout; unset leaves the transport default.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: rental_catalog_api::DEFAULT_BASE_URL.to_string(),
            page_size: 10,
            search_debounce_ms: 1000,
            notice_ttl_ms: 3000,
            max_retries: 2,
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> CoreResult<Self> {
        toml::from_str(s).map_err(|e| CoreError::Config(e.to_string()))
    }

    /// Read and parse a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> CoreResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(CoreError::Config(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    /// Clamp values to usable ranges.
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
