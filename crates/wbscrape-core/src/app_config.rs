use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub catalog_url: String,
    pub listing_base_url: String,
    pub site_origin: String,
    pub dest: i64,
    pub user_agent: String,
    /// `0` disables the request timeout entirely.
    pub request_timeout_secs: u64,
    pub max_pages: u32,
    /// `None` retries a failing page forever.
    pub max_retries: Option<u32>,
    pub retry_backoff_base_ms: u64,
    pub output_dir: PathBuf,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("catalog_url", &self.catalog_url)
            .field("listing_base_url", &self.listing_base_url)
            .field("site_origin", &self.site_origin)
            .field("dest", &self.dest)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_pages", &self.max_pages)
            .field(
                "max_retries",
                &self
                    .max_retries
                    .map_or_else(|| "unbounded".to_string(), |n| n.to_string()),
            )
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("output_dir", &self.output_dir)
            .field("log_level", &self.log_level)
            .finish()
    }
}
