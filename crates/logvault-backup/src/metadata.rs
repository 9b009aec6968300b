//! Mapping capture from the running index engine.

use std::time::Duration;

use logvault_core::{Error, IndexIdentity, Result, SettingsDocument};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Reads the live field mapping of an index from the engine.
pub struct MetadataCapturer {
    client: Client,
    engine_url: String,
}

impl MetadataCapturer {
    /// Create a capturer for the given engine base URL.
    pub fn new(engine_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                Error::MetadataUnavailable(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            engine_url: engine_url.trim_end_matches('/').to_string(),
        })
    }

    /// Capture the index's current mapping and combine it with the desired
    /// shard/replica counts into a settings document.
    ///
    /// Any failure is a hard stop for the backup: a restore procedure built
    /// on missing mapping data would silently recreate the index without a
    /// schema.
    pub async fn capture(
        &self,
        identity: &IndexIdentity,
        shard_count: u32,
        replica_count: u32,
    ) -> Result<SettingsDocument> {
        let url = format!("{}/{}/_mapping", self.engine_url, identity.name);
        debug!("fetching mapping from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::MetadataUnavailable(format!("mapping query failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::MetadataUnavailable(format!(
                "mapping query for {} returned {}",
                identity.name,
                response.status()
            )));
        }

        let mapping: Value = response.json().await.map_err(|e| {
            Error::MetadataUnavailable(format!("mapping response was not valid JSON: {}", e))
        })?;

        debug!("captured mapping for {}", identity.name);

        Ok(SettingsDocument::new(shard_count, replica_count, mapping))
    }
}
