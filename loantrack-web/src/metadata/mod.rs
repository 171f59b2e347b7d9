//! OpenBD bibliographic metadata client
//!
//! Queries the OpenBD lookup API by ISBN and normalizes its loosely-shaped
//! payload into a `BookMetadata` record. The upstream format is not
//! contractually stable, so all shape-guessing lives behind the pure
//! extraction functions in [`extract`]; the rest of the system only ever
//! sees the normalized record.
//!
//! Any network error, non-2xx status, or unparsable response collapses into
//! the same "not found" outcome as a missing record. The underlying cause is
//! logged server-side; callers cannot distinguish the two.

pub mod extract;

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Normalized bibliographic record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookMetadata {
    /// Best-effort title; caller falls back to the raw ISBN when absent
    pub title: Option<String>,
    /// Long-form descriptive text, fragments joined with blank lines
    pub text: Option<String>,
    /// Subject codes or headings in source order; first is "the" category
    pub subjects: Vec<String>,
}

/// OpenBD lookup client
#[derive(Clone)]
pub struct OpenBdClient {
    /// HTTP client for API requests
    http_client: Client,
    /// Base URL of the lookup service (configurable for tests)
    base_url: String,
}

impl OpenBdClient {
    /// Create a new client with a bounded request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Look up a book by ISBN.
    ///
    /// Returns `None` for "not found" — which deliberately covers network
    /// failures, non-2xx responses, unparsable bodies, and a null first
    /// array element alike. Never returns an error past this boundary.
    pub async fn lookup(&self, isbn: &str) -> Option<BookMetadata> {
        let url = format!("{}/get?isbn={}", self.base_url, urlencoding::encode(isbn));

        let response = match self.http_client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(isbn = %isbn, "OpenBD request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(isbn = %isbn, status = %response.status(), "OpenBD returned error status");
            return None;
        }

        let payload: serde_json::Value = match response.json().await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(isbn = %isbn, "Unparsable OpenBD response: {}", e);
                return None;
            }
        };

        let metadata = extract::parse_payload(&payload);
        debug!(
            isbn = %isbn,
            found = metadata.is_some(),
            "OpenBD lookup complete"
        );
        metadata
    }
}
