//! VIAF HTTP client
//!
//! Fetches the RDF/XML representation of a VIAF record via HTTP content
//! negotiation. One request per invocation, redirects followed, no retry:
//! a failed fetch is fatal to the run and surfaced to the operator.

use std::time::Duration;

use thiserror::Error;

const VIAF_BASE_URL: &str = "https://viaf.org/viaf";
const USER_AGENT: &str = "persnamer/0.1.0";
const ACCEPT_RDF_XML: &str = "application/rdf+xml";
const FETCH_TIMEOUT_SECS: u64 = 30;

/// VIAF client errors
#[derive(Debug, Error)]
pub enum ViafError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("VIAF returned HTTP {0}: {1}")]
    Api(u16, String),
}

/// VIAF API client
pub struct ViafClient {
    http_client: reqwest::Client,
}

impl ViafClient {
    pub fn new() -> Result<Self, ViafError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| ViafError::Network(e.to_string()))?;

        Ok(Self { http_client })
    }

    /// Canonical record URL for a VIAF identifier.
    pub fn record_url(viaf_id: &str) -> String {
        format!("{VIAF_BASE_URL}/{viaf_id}")
    }

    /// Fetch the raw RDF/XML bytes for a VIAF record.
    ///
    /// Sends `Accept: application/rdf+xml`; the server's redirect chain is
    /// followed. Any transport failure or non-success status is terminal.
    pub async fn fetch_record(&self, viaf_id: &str) -> Result<Vec<u8>, ViafError> {
        let url = Self::record_url(viaf_id);
        tracing::info!(url = %url, "Fetching VIAF record");

        let response = self
            .http_client
            .get(&url)
            .header(reqwest::header::ACCEPT, ACCEPT_RDF_XML)
            .send()
            .await
            .map_err(|e| ViafError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ViafError::Api(status.as_u16(), error_text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ViafError::Network(e.to_string()))?;

        tracing::info!(bytes = bytes.len(), "Fetched VIAF RDF data");
        Ok(bytes.to_vec())
    }
}

impl Default for ViafClient {
    fn default() -> Self {
        Self::new().expect("Failed to create VIAF client")
    }
}
