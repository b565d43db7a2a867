use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("catalog node at {path} is missing required field \"{field}\"")]
    MissingField { path: String, field: &'static str },

    #[error("catalog node at {path} is malformed: {reason}")]
    InvalidCatalogNode { path: String, reason: String },

    #[error("listing page {page} is malformed: {reason}")]
    MalformedListing { page: u32, reason: String },

    #[error("category \"{category}\" has no shard key and cannot be listed")]
    MissingShardKey { category: String },

    #[error("no catalog category matches {url}")]
    CategoryNotFound { url: String },
}

impl ScraperError {
    /// Returns `true` for errors that mean the wrong category or an
    /// unexpected link was supplied. These abort the current scrape and
    /// are never retried.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. }
                | Self::InvalidCatalogNode { .. }
                | Self::MalformedListing { .. }
                | Self::MissingShardKey { .. }
                | Self::CategoryNotFound { .. }
        )
    }
}
