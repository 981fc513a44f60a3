use std::path::PathBuf;

/// Credentials for the Shopify Admin API. Absent credentials are not an
/// error — the catalog contract degrades to "every vendor has no products".
#[derive(Clone)]
pub struct ShopifyCredentials {
    /// Shop host, e.g. `"example.myshopify.com"`.
    pub shop_url: String,
    pub access_token: String,
    pub api_version: String,
}

/// Credentials for the Cin7 Core (DEAR) external API.
#[derive(Clone)]
pub struct Cin7Credentials {
    pub account_id: String,
    pub api_key: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub shopify: Option<ShopifyCredentials>,
    pub cin7: Option<Cin7Credentials>,
    pub cin7_base_url: String,
    pub http_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub supplier_page_size: u32,
    /// Optional YAML overriding [`crate::Conventions::default`].
    pub conventions_path: Option<PathBuf>,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "shopify",
                &self.shopify.as_ref().map(|s| s.shop_url.as_str()),
            )
            .field("cin7", &self.cin7.as_ref().map(|_| "[redacted]"))
            .field("cin7_base_url", &self.cin7_base_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("supplier_page_size", &self.supplier_page_size)
            .field("conventions_path", &self.conventions_path)
            .field("log_level", &self.log_level)
            .finish()
    }
}
