use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Price bounds (major currency units) and minimum discount applied to a
/// listing scrape. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PriceFilterFields")]
pub struct PriceFilter {
    min_price: u64,
    max_price: u64,
    discount_threshold: u64,
}

impl PriceFilter {
    /// Builds a filter, rejecting ranges where `max_price < min_price`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPriceRange`] if the bounds are inverted.
    pub fn new(min_price: u64, max_price: u64, discount_threshold: u64) -> Result<Self, CoreError> {
        if max_price < min_price {
            return Err(CoreError::InvalidPriceRange {
                min_price,
                max_price,
            });
        }
        Ok(Self {
            min_price,
            max_price,
            discount_threshold,
        })
    }

    #[must_use]
    pub fn min_price(&self) -> u64 {
        self.min_price
    }

    #[must_use]
    pub fn max_price(&self) -> u64 {
        self.max_price
    }

    #[must_use]
    pub fn discount_threshold(&self) -> u64 {
        self.discount_threshold
    }

    /// The `priceU` parameter value: both bounds in minor units, `;`-separated.
    #[must_use]
    pub fn price_range_minor(&self) -> String {
        format!(
            "{};{}",
            self.min_price.saturating_mul(100),
            self.max_price.saturating_mul(100)
        )
    }

    /// Storefront link that shows the same filtered listing in a browser,
    /// so the user can eyeball the scrape result.
    #[must_use]
    pub fn verification_link(&self, category_url: &str) -> String {
        format!(
            "{category_url}?priceU={}&discount={}",
            self.price_range_minor(),
            self.discount_threshold
        )
    }
}

#[derive(Deserialize)]
struct PriceFilterFields {
    min_price: u64,
    max_price: u64,
    discount_threshold: u64,
}

impl TryFrom<PriceFilterFields> for PriceFilter {
    type Error = CoreError;

    fn try_from(fields: PriceFilterFields) -> Result<Self, Self::Error> {
        Self::new(fields.min_price, fields.max_price, fields.discount_threshold)
    }
}

impl Default for PriceFilter {
    fn default() -> Self {
        Self {
            min_price: 1,
            max_price: 1_000_000,
            discount_threshold: 0,
        }
    }
}
