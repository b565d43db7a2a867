//! One category scrape: menu → resolve → paginate → export.
//!
//! Failures abort only the current scrape. Callers turn them into a
//! user-facing message with [`failure_message`].

use std::io::Write;
use std::path::PathBuf;

use wbscrape_core::{AppConfig, CategoryDescriptor, PriceFilter};
use wbscrape_export::{export_file_stem, write_products, ExportError};
use wbscrape_scraper::{resolve_category, PagedFetcher, RetryPolicy, ScraperError, WbClient};

/// Outcome of a successful scrape.
#[derive(Debug)]
pub(crate) struct ScrapeSummary {
    pub category: String,
    pub collected: usize,
    pub export_path: PathBuf,
}

impl ScrapeSummary {
    pub(crate) fn log(&self) {
        tracing::info!(
            category = %self.category,
            collected = self.collected,
            path = %self.export_path.display(),
            "scrape finished"
        );
    }
}

pub(crate) struct Scraper {
    client: WbClient,
    site_origin: String,
    policy: RetryPolicy,
    max_pages: u32,
    output_dir: PathBuf,
}

impl Scraper {
    pub(crate) fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let client = WbClient::from_config(config)
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;
        Ok(Self {
            client,
            site_origin: config.site_origin.clone(),
            policy: RetryPolicy::from_config(config.max_retries, config.retry_backoff_base_ms),
            max_pages: config.max_pages,
            output_dir: config.output_dir.clone(),
        })
    }

    async fn load_catalog(&self) -> Result<Vec<CategoryDescriptor>, ScraperError> {
        Ok(self.client.fetch_catalog().await?.flatten())
    }

    /// Scrapes the category behind `target_url` and exports it, writing
    /// progress lines to `out`.
    pub(crate) async fn run<W: Write>(
        &self,
        target_url: &str,
        filter: &PriceFilter,
        out: &mut W,
    ) -> anyhow::Result<ScrapeSummary> {
        let catalog = self.load_catalog().await?;
        let category = resolve_category(&catalog, target_url, &self.site_origin).ok_or_else(
            || ScraperError::CategoryNotFound {
                url: target_url.to_owned(),
            },
        )?;
        writeln!(out, "Match found: {}", category.name)?;

        let fetcher = PagedFetcher::new(&self.client, self.site_origin.as_str())
            .with_retry_policy(self.policy)
            .with_max_pages(self.max_pages);

        let collected = fetcher
            .fetch_all_with(category, filter, |page| -> anyhow::Result<()> {
                writeln!(
                    out,
                    "Page {}: added {} products",
                    page.page,
                    page.products.len()
                )?;
                Ok(())
            })
            .await?;
        writeln!(out, "Collection finished. Collected: {} products.", collected.len())?;

        let stem = export_file_stem(&category.name, filter);
        let export_path = write_products(&self.output_dir, &stem, &collected)?;
        writeln!(out, "Result saved to {}", export_path.display())?;
        writeln!(
            out,
            "Link for verification: {}",
            filter.verification_link(target_url)
        )?;

        Ok(ScrapeSummary {
            category: category.name.clone(),
            collected: collected.len(),
            export_path,
        })
    }

    /// Prints `name<TAB>url<TAB>shard` for every catalog entry, optionally
    /// filtered by a case-insensitive substring of name or link.
    pub(crate) async fn print_categories<W: Write>(
        &self,
        contains: Option<&str>,
        out: &mut W,
    ) -> anyhow::Result<usize> {
        let catalog = self.load_catalog().await?;
        let needle = contains.map(str::to_lowercase);
        let mut shown = 0usize;
        for category in catalog.iter().filter(|c| {
            needle.as_deref().is_none_or(|n| {
                c.name.to_lowercase().contains(n) || c.url.to_lowercase().contains(n)
            })
        }) {
            writeln!(
                out,
                "{}\t{}\t{}",
                category.name,
                category.url,
                category.shard_key.as_deref().unwrap_or("-")
            )?;
            shown += 1;
        }
        Ok(shown)
    }
}

/// Maps a scrape failure to the message shown to the user.
pub(crate) fn failure_message(err: &anyhow::Error) -> String {
    if let Some(e) = err.downcast_ref::<ScraperError>() {
        if e.is_structural() {
            return format!(
                "Error! The category may be wrong. Make sure the link has no filters applied. ({e})"
            );
        }
    }
    if let Some(ExportError::FileBusy { path }) = err.downcast_ref::<ExportError>() {
        return format!(
            "Error! Close the previously opened file {} and try again.",
            path.display()
        );
    }
    format!("Error: {err:#}")
}
