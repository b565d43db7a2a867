pub mod app_config;
pub mod categories;
pub mod config;
pub mod filter;
pub mod products;

use thiserror::Error;

pub use app_config::AppConfig;
pub use categories::CategoryDescriptor;
pub use config::{load_app_config, load_app_config_from_env};
pub use filter::PriceFilter;
pub use products::ProductRecord;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid price range: max price {max_price} is below min price {min_price}")]
    InvalidPriceRange { min_price: u64, max_price: u64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
