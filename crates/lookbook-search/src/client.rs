//! HTTP client for the commerce search endpoint.

use std::time::Duration;

use reqwest::Client;

use lookbook_core::{AppConfig, Product};

use crate::error::SearchError;
use crate::normalize::extract_products;
use crate::types::SearchRequest;

/// HTTP client for the commerce search endpoint.
///
/// Authenticates with a basic-auth credential pair and surfaces non-success
/// statuses and unparseable bodies as typed errors. A search that succeeds
/// but matches no known result shape is zero results, not an error.
///
/// There is no retry or caching layer: a failed search is reported once and
/// the caller decides whether to re-issue it.
pub struct SearchClient {
    client: Client,
    endpoint: String,
    api_key: String,
    secret_key: String,
}

impl SearchClient {
    /// Creates a `SearchClient` with a configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        endpoint: &str,
        api_key: &str,
        secret_key: &str,
        timeout_secs: u64,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    /// Creates a `SearchClient` from application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`SearchClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, SearchError> {
        Self::new(
            &config.search_endpoint,
            &config.api_key,
            &config.secret_key,
            config.search_timeout_secs,
        )
    }

    /// Runs one search query and returns the normalized products.
    ///
    /// A blank query is substituted with the upstream's default before
    /// sending. An empty product list is a successful result.
    ///
    /// # Errors
    ///
    /// - [`SearchError::UnexpectedStatus`] — the endpoint answered with a
    ///   non-2xx status (surfaced for diagnostics, retriable by the caller).
    /// - [`SearchError::Deserialize`] — the body was not valid JSON.
    /// - [`SearchError::Http`] — the request could not be sent or timed out.
    pub async fn search(&self, query: &str, page_size: u32) -> Result<Vec<Product>, SearchError> {
        let request = SearchRequest::new(query, page_size);

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.api_key, Some(&self.secret_key))
            .header("X-Requested-With", "GrapheneFetch")
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let body = response.text().await?;
        let payload =
            serde_json::from_str::<serde_json::Value>(&body).map_err(|e| {
                SearchError::Deserialize {
                    context: format!("search response for \"{}\"", request.search_text),
                    source: e,
                }
            })?;

        let products = extract_products(&payload);
        tracing::info!(
            query = %request.search_text,
            count = products.len(),
            "search completed"
        );

        Ok(products)
    }
}
