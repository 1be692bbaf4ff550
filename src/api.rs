//! REST client for the uptime backend.
//!
//! Thin wrapper over the backend's JSON API. Every request carries
//! `Accept: application/json`; failures collapse into the two-kind error
//! taxonomy the rest of the client handles uniformly.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sitewatch::api::ApiClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::builder()
//!         .endpoint("http://localhost:5000")
//!         .build();
//!
//!     let sites = client.fetch_sites().await?;
//!     for site in &sites {
//!         println!("{}: {} ({}ms)", site.name, site.status, site.response_time);
//!     }
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::{header, Client};
use thiserror::Error;

use crate::data::{NewSite, Site, SiteDetail, SiteId, Snapshot};

/// Errors from backend requests.
///
/// Both kinds are handled identically by callers: logged, surfaced as a
/// transient notice, and the triggering operation dropped until its next
/// natural trigger. None is fatal to the poll loop.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure, timeout, or non-2xx response.
    #[error("network error: {0}")]
    Network(String),

    /// The response body was not the expected JSON shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Malformed(err.to_string())
        } else if err.is_timeout() {
            ApiError::Network("request timed out".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Client for the uptime backend's REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    endpoint: String,
}

impl ApiClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// The configured backend endpoint, for display in the status bar.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the full site collection.
    pub async fn fetch_sites(&self) -> Result<Snapshot, ApiError> {
        let url = format!("{}/api/sites", self.endpoint);
        let response = self.client.get(&url).send().await?;
        let response = expect_success(response)?;
        Ok(response.json().await?)
    }

    /// Fetch a single site together with its check history.
    pub async fn fetch_site(&self, id: SiteId) -> Result<SiteDetail, ApiError> {
        let url = format!("{}/api/sites/{}", self.endpoint, id);
        let response = self.client.get(&url).send().await?;
        let response = expect_success(response)?;
        Ok(response.json().await?)
    }

    /// Force an immediate re-check of a site. Returns the fresh result,
    /// which callers feed to the reconciler as a one-element snapshot.
    pub async fn check_site(&self, id: SiteId) -> Result<Site, ApiError> {
        let url = format!("{}/api/sites/{}/check", self.endpoint, id);
        let response = self.client.post(&url).send().await?;
        let response = expect_success(response)?;
        Ok(response.json().await?)
    }

    /// Register a new site with the backend.
    pub async fn create_site(&self, site: &NewSite) -> Result<Site, ApiError> {
        let url = format!("{}/api/sites", self.endpoint);
        let response = self.client.post(&url).json(site).send().await?;
        let response = expect_success(response)?;
        Ok(response.json().await?)
    }

    /// Remove a site. This is the one path that deletes: periodic polls
    /// never remove sites from the local store.
    pub async fn delete_site(&self, id: SiteId) -> Result<(), ApiError> {
        let url = format!("{}/api/sites/{}", self.endpoint, id);
        let response = self.client.delete(&url).send().await?;
        expect_success(response)?;
        Ok(())
    }
}

fn expect_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    if !response.status().is_success() {
        return Err(ApiError::Network(format!(
            "API returned status {}",
            response.status()
        )));
    }
    Ok(response)
}

/// Builder for [`ApiClient`].
#[derive(Debug, Default)]
pub struct ApiClientBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl ApiClientBuilder {
    /// Set the backend endpoint (e.g., "http://localhost:5000").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> ApiClient {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| "http://localhost:5000".to_string());

        ApiClient {
            client,
            // Trailing slash would produce "//api/sites"
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = ApiClient::builder().build();
        assert_eq!(client.endpoint(), "http://localhost:5000");
    }

    #[test]
    fn test_builder_strips_trailing_slash() {
        let client = ApiClient::builder()
            .endpoint("http://monitor.local:8080/")
            .build();
        assert_eq!(client.endpoint(), "http://monitor.local:8080");
    }

    #[test]
    fn test_new_site_body_omits_absent_name() {
        let body = serde_json::to_value(NewSite {
            url: "https://example.com".to_string(),
            name: None,
            check_interval: 60,
        })
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({"url": "https://example.com", "check_interval": 60})
        );
    }
}
