//! Listing endpoint URL construction.

use reqwest::Url;

use crate::error::ScraperError;
use crate::fetch_all::PageRequest;

/// Builds the listing URL for one page:
///
/// ```text
/// {base}/{shard}/catalog?appType=1&curr=rub&dest={dest}&locale=ru&page={n}
///     &priceU={min*100};{max*100}&sort=popular&spp=0&{query}&discount={d}
/// ```
///
/// The category's pre-built `query` fragment is spliced in verbatim because
/// it already carries the endpoint's own encoding (e.g. `subject=1;2;3`).
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if the result is not a valid URL.
pub fn build_listing_url(
    base_url: &str,
    dest: i64,
    request: &PageRequest<'_>,
) -> Result<Url, ScraperError> {
    let base = base_url.trim_end_matches('/');
    let shard = request.shard_key.trim_matches('/');
    let filter = request.filter;

    let mut raw = format!(
        "{base}/{shard}/catalog?appType=1&curr=rub&dest={dest}&locale=ru&page={page}\
         &priceU={price}&sort=popular&spp=0",
        page = request.page,
        price = filter.price_range_minor(),
    );
    if let Some(query) = request
        .query_params
        .map(|q| q.trim_start_matches(['?', '&']))
        .filter(|q| !q.is_empty())
    {
        raw.push('&');
        raw.push_str(query);
    }
    raw.push_str(&format!("&discount={}", filter.discount_threshold()));

    Url::parse(&raw).map_err(|e| ScraperError::InvalidUrl {
        url: raw.clone(),
        reason: e.to_string(),
    })
}
