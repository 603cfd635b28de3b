//! Fetcher collaborator: the seam between the pipeline and the network
//!
//! The orchestrator and chain resolver only ever talk to a [`Fetcher`], so tests substitute a
//! canned implementation and never touch the network.

use std::time::Duration;

use crate::{Error, Result};

/// Network access used by the pipeline: JSON for the tl-browser API envelopes, bytes for trust
/// list payloads and issuer certificates.
pub trait Fetcher {
    /// Fetches and parses a JSON document.
    fn fetch_json(&self, url: &str) -> Result<serde_json::Value>;
    /// Fetches raw bytes.
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP implementation of [`Fetcher`].
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a 10 second request timeout.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(HttpFetcher { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_json(&self, url: &str) -> Result<serde_json::Value> {
        let bytes = self.fetch_bytes(url)?;
        serde_json::from_slice(&bytes).map_err(|e| Error::MalformedJson(e.to_string()))
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().map_err(|e| Error::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if !response.status().is_success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                reason: format!("HTTP status {}", response.status()),
            });
        }
        let bytes = response.bytes().map_err(|e| Error::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }
}
