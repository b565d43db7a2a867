//! Page-by-page retrieval of a category listing.
//!
//! The listing endpoint gives no page count, so a category is read from
//! page 1 upward until a page normalizes to zero products. That inference
//! assumes results are contiguous with a trailing empty page; a hard page
//! cap bounds the work if the endpoint never returns one.

use std::future::Future;

use futures::stream::{self, Stream, StreamExt};
use serde_json::Value;
use wbscrape_core::{CategoryDescriptor, PriceFilter, ProductRecord};

use crate::error::ScraperError;
use crate::normalize::normalize_page;
use crate::retry::{retry_with_policy, RetryPolicy};

/// Pages requested per category before giving up on finding an empty page.
pub const DEFAULT_MAX_PAGES: u32 = 50;

/// Everything needed to request one listing page.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    pub shard_key: &'a str,
    pub query_params: Option<&'a str>,
    /// 1-based page number.
    pub page: u32,
    pub filter: &'a PriceFilter,
}

/// The listing endpoint, reduced to "give me the raw JSON of page N".
///
/// Implementations report any transport, status, or decoding failure as an
/// error; the fetcher decides whether to retry it.
pub trait ListingSource {
    fn fetch_page(
        &self,
        request: &PageRequest<'_>,
    ) -> impl Future<Output = Result<Value, ScraperError>> + Send;
}

/// A non-empty, normalized listing page.
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub page: u32,
    pub products: Vec<ProductRecord>,
}

enum FetchState {
    Fetching(u32),
    Done,
}

/// Drives sequential, retry-wrapped page fetches against a [`ListingSource`].
pub struct PagedFetcher<S> {
    source: S,
    site_origin: String,
    policy: RetryPolicy,
    max_pages: u32,
}

impl<S: ListingSource> PagedFetcher<S> {
    /// Creates a fetcher with the unbounded retry policy and the default
    /// page cap. `site_origin` is used for product links.
    pub fn new(source: S, site_origin: impl Into<String>) -> Self {
        Self {
            source,
            site_origin: site_origin.into(),
            policy: RetryPolicy::unbounded(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Lazily yields the non-empty pages of `category` in page order.
    ///
    /// Page `n + 1` is only requested after page `n` has been normalized.
    /// The stream ends after the first empty page, after `max_pages`
    /// requests, or after yielding an error.
    pub fn pages<'a>(
        &'a self,
        category: &'a CategoryDescriptor,
        filter: &'a PriceFilter,
    ) -> impl Stream<Item = Result<ListingPage, ScraperError>> + 'a {
        stream::unfold(FetchState::Fetching(1), move |state| async move {
            let FetchState::Fetching(page) = state else {
                return None;
            };

            if page > self.max_pages {
                tracing::warn!(
                    category = %category.name,
                    max_pages = self.max_pages,
                    "page cap reached before an empty page; listing may be truncated"
                );
                return None;
            }

            match self.fetch_products(category, filter, page).await {
                Ok(products) if products.is_empty() => {
                    tracing::info!(category = %category.name, page, "empty page, listing exhausted");
                    None
                }
                Ok(products) => Some((
                    Ok(ListingPage { page, products }),
                    FetchState::Fetching(page + 1),
                )),
                Err(e) => Some((Err(e), FetchState::Done)),
            }
        })
    }

    /// Collects every product of `category` into one ordered list.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::MissingShardKey`] if the category cannot be listed.
    /// - [`ScraperError::MalformedListing`] if a page lacks `data.products`.
    /// - The last transient error, only when a bounded retry policy runs out.
    pub async fn fetch_all(
        &self,
        category: &CategoryDescriptor,
        filter: &PriceFilter,
    ) -> Result<Vec<ProductRecord>, ScraperError> {
        self.fetch_all_with(category, filter, |_| Ok::<_, ScraperError>(()))
            .await
    }

    /// Like [`PagedFetcher::fetch_all`], calling `on_page` after each
    /// non-empty page is collected. An error from `on_page` stops the
    /// collection before the next page is requested.
    ///
    /// # Errors
    ///
    /// Any [`ScraperError`] of [`PagedFetcher::fetch_all`], converted into
    /// `E`, or the first error returned by `on_page`.
    pub async fn fetch_all_with<E, F>(
        &self,
        category: &CategoryDescriptor,
        filter: &PriceFilter,
        mut on_page: F,
    ) -> Result<Vec<ProductRecord>, E>
    where
        E: From<ScraperError>,
        F: FnMut(&ListingPage) -> Result<(), E>,
    {
        let mut all_products: Vec<ProductRecord> = Vec::new();
        let mut pages = std::pin::pin!(self.pages(category, filter));

        while let Some(page) = pages.next().await {
            let page = page?;
            tracing::info!(
                page = page.page,
                added = page.products.len(),
                "listing page collected"
            );
            on_page(&page)?;
            all_products.extend(page.products);
        }

        tracing::info!(
            category = %category.name,
            total = all_products.len(),
            "listing collection finished"
        );
        Ok(all_products)
    }

    async fn fetch_products(
        &self,
        category: &CategoryDescriptor,
        filter: &PriceFilter,
        page: u32,
    ) -> Result<Vec<ProductRecord>, ScraperError> {
        let shard_key = category
            .queryable_shard()
            .ok_or_else(|| ScraperError::MissingShardKey {
                category: category.name.clone(),
            })?;

        let request = PageRequest {
            shard_key,
            query_params: category.query_params.as_deref(),
            page,
            filter,
        };

        let body = retry_with_policy(&self.policy, || self.source.fetch_page(&request)).await?;
        normalize_page(&body, page, &self.site_origin)
    }
}

#[cfg(test)]
#[path = "fetch_all_test.rs"]
mod tests;
