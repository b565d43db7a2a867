use serde::{Deserialize, Serialize};

/// A listing entry normalized into the fixed shape used for tabular export.
///
/// Every field is present on every record; values the listing omitted are
/// `None` rather than missing, so rows stay aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: Option<u64>,
    pub name: Option<String>,
    /// Price in major currency units (`priceU / 100`, truncated).
    pub original_price: Option<i64>,
    /// Sale price in major currency units (`salePriceU / 100`, truncated).
    pub discounted_price: Option<i64>,
    pub cashback_points: Option<i64>,
    pub discount_percentage: Option<i64>,
    pub brand: Option<String>,
    pub rating: Option<f64>,
    pub supplier_info: Option<String>,
    pub supplier_rating: Option<f64>,
    pub feedback_count: Option<i64>,
    pub review_rating: Option<f64>,
    pub promo_text_card: Option<String>,
    pub promo_text_category: Option<String>,
    /// Canonical product page, derived from `id`.
    pub product_url: Option<String>,
}
