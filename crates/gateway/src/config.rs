//! Gateway configuration.

use crate::error::{GatewayError, GatewayResult};

/// Blob-store bucket names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buckets {
    /// Bucket holding asset payloads (access-gated).
    pub assets: String,
    /// Bucket holding preview payloads (publicly renderable).
    pub previews: String,
}

impl Default for Buckets {
    fn default() -> Self {
        Self {
            assets: "assets".to_string(),
            previews: "previews".to_string(),
        }
    }
}

/// Configuration for the REST gateway (endpoint, credentials, buckets).
///
/// A missing endpoint or anon key is a [`GatewayError::Configuration`]
/// produced *before* any I/O is attempted.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    endpoint: String,
    anon_key: String,
    pub buckets: Buckets,
}

impl GatewayConfig {
    pub fn new(endpoint: impl Into<String>, anon_key: impl Into<String>) -> GatewayResult<Self> {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        let anon_key = anon_key.into();
        if endpoint.is_empty() {
            return Err(GatewayError::configuration("missing endpoint"));
        }
        if anon_key.is_empty() {
            return Err(GatewayError::configuration("missing anon key"));
        }
        Ok(Self {
            endpoint,
            anon_key,
            buckets: Buckets::default(),
        })
    }

    /// Load configuration from the environment.
    ///
    /// `TIERVAULT_ENDPOINT` and `TIERVAULT_ANON_KEY` are required;
    /// `TIERVAULT_ASSETS_BUCKET` / `TIERVAULT_PREVIEWS_BUCKET` override the
    /// default bucket names.
    pub fn from_env() -> GatewayResult<Self> {
        let endpoint = std::env::var("TIERVAULT_ENDPOINT")
            .map_err(|_| GatewayError::configuration("TIERVAULT_ENDPOINT is not set"))?;
        let anon_key = std::env::var("TIERVAULT_ANON_KEY")
            .map_err(|_| GatewayError::configuration("TIERVAULT_ANON_KEY is not set"))?;
        let mut config = Self::new(endpoint, anon_key)?;
        if let Ok(bucket) = std::env::var("TIERVAULT_ASSETS_BUCKET") {
            config.buckets.assets = bucket;
        }
        if let Ok(bucket) = std::env::var("TIERVAULT_PREVIEWS_BUCKET") {
            config.buckets.previews = bucket;
        }
        Ok(config)
    }

    pub fn with_buckets(mut self, buckets: Buckets) -> Self {
        self.buckets = buckets;
        self
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    /// Base URL of the record store (`{endpoint}/rest/v1`).
    pub fn rest_base(&self) -> String {
        format!("{}/rest/v1", self.endpoint)
    }

    /// Base URL of the blob store (`{endpoint}/storage/v1`).
    pub fn storage_base(&self) -> String {
        format!("{}/storage/v1", self.endpoint)
    }
}
