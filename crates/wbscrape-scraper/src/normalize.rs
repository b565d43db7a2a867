//! Normalization from raw listing pages to [`wbscrape_core::ProductRecord`].

use serde_json::{Map, Value};
use wbscrape_core::ProductRecord;

use crate::error::ScraperError;
use crate::types::RawProduct;

/// Normalizes one listing page into product records, one per raw entry and
/// in the same order.
///
/// `site_origin` is used to build each product's canonical link. Entries are
/// read field by field: a value of an unexpected type becomes `None` on that
/// record and never fails the page.
///
/// # Errors
///
/// Returns [`ScraperError::MalformedListing`] if the page has no
/// `data.products` array. This usually means a filtered link or a
/// non-listing category was targeted.
pub fn normalize_page(
    page_body: &Value,
    page: u32,
    site_origin: &str,
) -> Result<Vec<ProductRecord>, ScraperError> {
    let products = page_body
        .get("data")
        .and_then(|data| data.get("products"))
        .ok_or_else(|| ScraperError::MalformedListing {
            page,
            reason: "response has no data.products".to_owned(),
        })?;
    let entries = products
        .as_array()
        .ok_or_else(|| ScraperError::MalformedListing {
            page,
            reason: "data.products is not an array".to_owned(),
        })?;

    Ok(entries
        .iter()
        .map(|entry| normalize_product(RawProduct::from_value(entry), site_origin))
        .collect())
}

impl RawProduct {
    /// Reads a raw entry. Non-object entries yield an all-`None` product so
    /// the page keeps its length.
    #[must_use]
    pub fn from_value(entry: &Value) -> Self {
        let Some(fields) = entry.as_object() else {
            tracing::debug!(%entry, "listing entry is not an object");
            return Self::default();
        };
        Self {
            id: unsigned(fields, "id"),
            name: text(fields, "name"),
            price_u: integer(fields, "priceU"),
            sale_price_u: integer(fields, "salePriceU"),
            feedback_points: integer(fields, "feedbackPoints"),
            sale: integer(fields, "sale"),
            brand: text(fields, "brand"),
            rating: float(fields, "rating"),
            supplier: text(fields, "supplier"),
            supplier_rating: float(fields, "supplierRating"),
            feedbacks: integer(fields, "feedbacks"),
            review_rating: float(fields, "reviewRating"),
            promo_text_card: text(fields, "promoTextCard"),
            promo_text_category: text(fields, "promoTextCat"),
        }
    }
}

/// Integer value of `key`; floats are truncated toward zero.
#[allow(clippy::cast_possible_truncation)]
fn integer(fields: &Map<String, Value>, key: &str) -> Option<i64> {
    let value = fields.get(key)?;
    value
        .as_i64()
        .or_else(|| value.as_u64().and_then(|n| i64::try_from(n).ok()))
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| f.is_finite() && f.abs() < 9.2e18)
                .map(|f| f.trunc() as i64)
        })
}

fn unsigned(fields: &Map<String, Value>, key: &str) -> Option<u64> {
    integer(fields, key)
        .and_then(|n| u64::try_from(n).ok())
        .or_else(|| fields.get(key)?.as_u64())
}

fn float(fields: &Map<String, Value>, key: &str) -> Option<f64> {
    fields.get(key)?.as_f64()
}

fn text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key)?.as_str().map(str::to_owned)
}

/// Normalizes a single raw listing entry.
#[must_use]
pub fn normalize_product(raw: RawProduct, site_origin: &str) -> ProductRecord {
    let product_url = raw.id.map(|id| product_link(site_origin, id));
    ProductRecord {
        id: raw.id,
        name: raw.name,
        original_price: raw.price_u.map(minor_to_major),
        discounted_price: raw.sale_price_u.map(minor_to_major),
        cashback_points: raw.feedback_points,
        discount_percentage: raw.sale,
        brand: raw.brand,
        rating: raw.rating,
        supplier_info: raw.supplier,
        supplier_rating: raw.supplier_rating,
        feedback_count: raw.feedbacks,
        review_rating: raw.review_rating,
        promo_text_card: raw.promo_text_card,
        promo_text_category: raw.promo_text_category,
        product_url,
    }
}

/// Kopecks to roubles, truncated toward zero.
fn minor_to_major(minor: i64) -> i64 {
    minor / 100
}

fn product_link(site_origin: &str, id: u64) -> String {
    format!(
        "{}/catalog/{id}/detail.aspx?targetUrl=BP",
        site_origin.trim_end_matches('/')
    )
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
