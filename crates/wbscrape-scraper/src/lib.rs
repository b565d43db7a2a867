pub mod catalog;
pub mod client;
pub mod error;
pub mod fetch_all;
pub mod normalize;
pub mod resolve;
pub mod retry;
pub mod types;

pub use catalog::flatten_catalog;
pub use client::WbClient;
pub use error::ScraperError;
pub use fetch_all::{ListingPage, ListingSource, PageRequest, PagedFetcher, DEFAULT_MAX_PAGES};
pub use normalize::normalize_page;
pub use resolve::{resolve_category, strip_origin};
pub use retry::RetryPolicy;
pub use types::{CatalogTree, CategoryNode};
