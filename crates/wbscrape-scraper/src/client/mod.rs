//! HTTP client for the storefront's category menu and listing endpoints.

mod listing_url;

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use wbscrape_core::AppConfig;

use crate::error::ScraperError;
use crate::fetch_all::{ListingSource, PageRequest};
use crate::types::CatalogTree;

pub use listing_url::build_listing_url;

/// Endpoint locations and routing parameters for a [`WbClient`].
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub catalog_url: String,
    /// Listing root; `/{shard}/catalog` is appended per request.
    pub listing_base_url: String,
    /// Delivery region the listing prices are computed for.
    pub dest: i64,
}

impl Endpoints {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            catalog_url: config.catalog_url.clone(),
            listing_base_url: config.listing_base_url.clone(),
            dest: config.dest,
        }
    }
}

/// HTTP client for the category menu document and the paginated listing
/// endpoint.
///
/// The client performs single attempts only. Retrying listing pages is the
/// job of [`crate::PagedFetcher`].
pub struct WbClient {
    client: Client,
    endpoints: Endpoints,
}

impl WbClient {
    /// Creates a client with the given `User-Agent` and timeout.
    ///
    /// `timeout_secs == 0` disables the request timeout, so a hung endpoint
    /// hangs the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        endpoints: Endpoints,
        user_agent: &str,
        timeout_secs: u64,
    ) -> Result<Self, ScraperError> {
        let mut builder = Client::builder().user_agent(user_agent);
        if timeout_secs > 0 {
            builder = builder
                .timeout(Duration::from_secs(timeout_secs))
                .connect_timeout(Duration::from_secs(timeout_secs.min(10)));
        }
        let client = builder.build()?;
        Ok(Self { client, endpoints })
    }

    /// Creates a client from the application config.
    ///
    /// # Errors
    ///
    /// See [`WbClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            Endpoints::from_config(config),
            &config.user_agent,
            config.request_timeout_secs,
        )
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Fetches the category menu and converts it into a [`CatalogTree`].
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] on network failure.
    /// - [`ScraperError::UnexpectedStatus`] on any non-2xx status.
    /// - [`ScraperError::Deserialize`] if the body is not JSON.
    /// - [`ScraperError::MissingField`] / [`ScraperError::InvalidCatalogNode`]
    ///   if the menu does not have the expected node shape.
    pub async fn fetch_catalog(&self) -> Result<CatalogTree, ScraperError> {
        let url = &self.endpoints.catalog_url;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "*/*")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.clone(),
            });
        }

        let body = response.text().await?;
        let raw: Value = serde_json::from_str(&body).map_err(|e| ScraperError::Deserialize {
            context: format!("category menu from {url}"),
            source: e,
        })?;

        let tree = CatalogTree::from_value(&raw)?;
        tracing::info!(nodes = tree.node_count(), "category menu loaded");
        Ok(tree)
    }

    /// Fetches one listing page as raw JSON.
    ///
    /// The response status and page number are logged before the body is
    /// parsed.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if the listing URL cannot be built.
    /// - [`ScraperError::Http`] on network failure.
    /// - [`ScraperError::UnexpectedStatus`] on any non-2xx status.
    /// - [`ScraperError::Deserialize`] if the body is not JSON.
    pub async fn fetch_listing_page(
        &self,
        request: &PageRequest<'_>,
    ) -> Result<Value, ScraperError> {
        let url = build_listing_url(&self.endpoints.listing_base_url, self.endpoints.dest, request)?;
        tracing::debug!(url = %url, "requesting listing page");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        tracing::info!(status = status.as_u16(), page = request.page, "listing page received");

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<Value>(&body).map_err(|e| ScraperError::Deserialize {
            context: format!("listing page {} for shard {}", request.page, request.shard_key),
            source: e,
        })
    }
}

impl ListingSource for WbClient {
    async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Value, ScraperError> {
        self.fetch_listing_page(request).await
    }
}

impl ListingSource for &WbClient {
    async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Value, ScraperError> {
        self.fetch_listing_page(request).await
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
