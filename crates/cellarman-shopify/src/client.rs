//! HTTP client for the Shopify Admin GraphQL API, scoped to the single
//! vendor-products query the reconciliation engine needs.
//!
//! Products are searched across every publication status (active, draft,
//! archived) — a draft product is still a valid match target. An unknown
//! vendor is an empty result, not an error.

use std::time::Duration;

use cellarman_core::app_config::ShopifyCredentials;
use cellarman_core::CatalogProduct;
use reqwest::Client;

use crate::error::ShopifyError;
use crate::normalize::normalize_product;
use crate::retry::retry_with_backoff;
use crate::types::{GraphQlEnvelope, PageInfo, ShopifyProduct};

/// Maximum number of pages to fetch for one vendor before returning an
/// error. Prevents infinite loops on a cycling cursor.
const MAX_PAGES: usize = 40;

const PRODUCTS_QUERY: &str = r#"
query ($query: String!, $after: String) {
  products(first: 50, query: $query, after: $after) {
    pageInfo { hasNextPage endCursor }
    edges {
      node {
        id
        title
        status
        formatMeta: metafield(namespace: "custom", key: "Format") { value }
        kegTypeMeta: metafield(namespace: "custom", key: "KegType") { value }
        featuredImage { url }
        variants(first: 20) {
          edges { node { id title sku inventoryQuantity } }
        }
      }
    }
  }
}
"#;

/// Client for the Shopify Admin GraphQL endpoint.
///
/// Use [`ShopifyClient::new`] with real credentials, or
/// [`ShopifyClient::with_endpoint`] to point at a mock server in tests.
pub struct ShopifyClient {
    client: Client,
    access_token: String,
    endpoint: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl ShopifyClient {
    /// Creates a client for the shop named in `credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ShopifyError::InvalidShopUrl`] if the
    /// shop URL does not form a valid endpoint.
    pub fn new(
        credentials: &ShopifyCredentials,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ShopifyError> {
        let trimmed = credentials.shop_url.trim_end_matches('/');
        let base = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };
        let endpoint = format!("{base}/admin/api/{}/graphql.json", credentials.api_version);
        if reqwest::Url::parse(&endpoint).is_err() {
            return Err(ShopifyError::InvalidShopUrl {
                shop_url: credentials.shop_url.clone(),
                reason: "shop URL does not form a valid GraphQL endpoint".to_string(),
            });
        }
        Self::with_endpoint(
            &endpoint,
            &credentials.access_token,
            timeout_secs,
            max_retries,
            backoff_base_secs,
        )
    }

    /// Creates a client against an explicit endpoint URL (for wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_endpoint(
        endpoint: &str,
        access_token: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ShopifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("cellarman/0.1 (invoice-reconciliation)")
            .build()?;
        Ok(Self {
            client,
            access_token: access_token.to_owned(),
            endpoint: endpoint.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches every catalog product for `vendor`, following cursor
    /// pagination, and normalizes the nodes into [`CatalogProduct`]s.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::Api`] if the GraphQL response carries errors.
    /// - [`ShopifyError::RateLimited`] / [`ShopifyError::UnexpectedStatus`] /
    ///   [`ShopifyError::Http`] after retries are exhausted.
    /// - [`ShopifyError::Deserialize`] if the body does not match the
    ///   expected shape.
    /// - [`ShopifyError::PaginationLimit`] if the cursor never terminates.
    pub async fn fetch_products_by_vendor(
        &self,
        vendor: &str,
    ) -> Result<Vec<CatalogProduct>, ShopifyError> {
        let mut products: Vec<CatalogProduct> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(ShopifyError::PaginationLimit {
                    vendor: vendor.to_owned(),
                    max_pages: MAX_PAGES,
                });
            }

            let (nodes, page_info) = retry_with_backoff(
                self.max_retries,
                self.backoff_base_secs,
                || self.fetch_page(vendor, cursor.as_deref()),
            )
            .await?;

            products.extend(nodes.into_iter().map(normalize_product));

            if page_info.has_next_page {
                cursor = page_info.end_cursor;
                if cursor.is_none() {
                    // hasNextPage without a cursor would loop on page one.
                    return Err(ShopifyError::Api(
                        "pageInfo.hasNextPage is true but endCursor is null".to_string(),
                    ));
                }
            } else {
                break;
            }
        }

        Ok(products)
    }

    /// Fetches one page of the vendor query.
    async fn fetch_page(
        &self,
        vendor: &str,
        cursor: Option<&str>,
    ) -> Result<(Vec<ShopifyProduct>, PageInfo), ShopifyError> {
        let body = serde_json::json!({
            "query": PRODUCTS_QUERY,
            "variables": {
                "query": Self::vendor_query(vendor),
                "after": cursor,
            },
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Shopify-Access-Token", &self.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(2);
            return Err(ShopifyError::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            return Err(ShopifyError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let text = response.text().await?;
        let envelope: GraphQlEnvelope =
            serde_json::from_str(&text).map_err(|e| ShopifyError::Deserialize {
                context: format!("products page for vendor '{vendor}'"),
                source: e,
            })?;

        if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
            let joined = errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ShopifyError::Api(joined));
        }

        let data = envelope
            .data
            .ok_or_else(|| ShopifyError::Api("response carried no data".to_string()))?;

        let connection = data.products;
        let nodes = connection.edges.into_iter().map(|e| e.node).collect();
        Ok((nodes, connection.page_info))
    }

    /// Builds the vendor search term, escaping single quotes so a name like
    /// `Polly's Brew Co.` stays inside the quoted query value.
    fn vendor_query(vendor: &str) -> String {
        let escaped = vendor.replace('\'', "\\'");
        format!("vendor:'{escaped}'")
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
