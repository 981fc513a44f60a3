//! HTTP client for the Cin7 Core (DEAR) external API.
//!
//! Lookups (`/product`, `/supplier`) treat HTTP 404 and empty result lists
//! as `None` — an unmatched SKU or supplier is an expected outcome, not a
//! fault — and retry transient failures. Purchase submission (`/purchase`,
//! `/purchase/order`) is never retried: the API has no idempotency token and
//! a blind retry could raise the same order twice.

use std::time::Duration;

use cellarman_core::app_config::Cin7Credentials;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::Cin7Error;
use crate::retry::retry_with_backoff;
use crate::types::{
    ProductListResponse, PurchaseCreated, PurchaseHeader, PurchaseOrderLine, PurchaseOrderPayload,
    SupplierListResponse, SupplierRecord,
};

/// Client for the Cin7 Core external API v2.
pub struct Cin7Client {
    client: Client,
    account_id: String,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl Cin7Client {
    /// Creates a client against `base_url` (the production default lives in
    /// the application config; tests pass a wiremock URI).
    ///
    /// # Errors
    ///
    /// Returns [`Cin7Error::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`Cin7Error::InvalidBaseUrl`] for an unparseable
    /// base URL.
    pub fn new(
        credentials: &Cin7Credentials,
        base_url: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, Cin7Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("cellarman/0.1 (invoice-reconciliation)")
            .build()?;

        // Ensure exactly one trailing slash so Url::join appends rather than
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|e| Cin7Error::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            account_id: credentials.account_id.clone(),
            api_key: credentials.api_key.clone(),
            base_url,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Looks up the internal product ID carrying exactly `sku`.
    ///
    /// Returns `Ok(None)` when no product carries that stock code — the
    /// normal outcome for SKUs not yet created in the inventory system.
    ///
    /// # Errors
    ///
    /// Returns transport/deserialization errors after retries are exhausted.
    pub async fn product_id_by_sku(&self, sku: &str) -> Result<Option<String>, Cin7Error> {
        let url = self.build_url("product", &[("Page", "1"), ("Limit", "100"), ("Sku", sku)]);
        let context = format!("product lookup for SKU '{sku}'");
        let Some(body) = self.get_with_retry::<ProductListResponse>(&url, &context).await? else {
            return Ok(None);
        };
        Ok(body
            .products
            .into_iter()
            .find(|p| p.sku.as_deref() == Some(sku))
            .map(|p| p.id))
    }

    /// Looks up a supplier by exact name.
    ///
    /// # Errors
    ///
    /// Returns transport/deserialization errors after retries are exhausted.
    pub async fn supplier_by_name(&self, name: &str) -> Result<Option<SupplierRecord>, Cin7Error> {
        let url = self.build_url(
            "supplier",
            &[("Page", "1"), ("Limit", "100"), ("Name", name)],
        );
        let context = format!("supplier lookup for '{name}'");
        let Some(body) = self
            .get_with_retry::<SupplierListResponse>(&url, &context)
            .await?
        else {
            return Ok(None);
        };
        Ok(body.suppliers.into_iter().next())
    }

    /// Fetches one page of the full supplier directory.
    ///
    /// # Errors
    ///
    /// Returns transport/deserialization errors after retries are exhausted.
    pub async fn supplier_page(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<Vec<SupplierRecord>, Cin7Error> {
        let url = self.build_url(
            "supplier",
            &[("Page", &page.to_string()), ("Limit", &limit.to_string())],
        );
        let context = format!("supplier directory page {page}");
        let body = self
            .get_with_retry::<SupplierListResponse>(&url, &context)
            .await?;
        Ok(body.map(|b| b.suppliers).unwrap_or_default())
    }

    /// Creates a purchase-order header and returns the task ID that lines
    /// attach to. Not retried — the endpoint is not idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`Cin7Error::UnexpectedStatus`] with the upstream body
    /// verbatim on any non-2xx response.
    pub async fn create_purchase(&self, header: &PurchaseHeader) -> Result<String, Cin7Error> {
        let url = self.build_url("purchase", &[]);
        let text = self.post_json(&url, header).await?;
        let created: PurchaseCreated =
            serde_json::from_str(&text).map_err(|e| Cin7Error::Deserialize {
                context: "purchase create".to_string(),
                source: e,
            })?;
        Ok(created.id)
    }

    /// Attaches the order-line array to a previously created purchase task.
    /// Not retried — see [`Cin7Client::create_purchase`].
    ///
    /// # Errors
    ///
    /// Returns [`Cin7Error::UnexpectedStatus`] with the upstream body
    /// verbatim on any non-2xx response.
    pub async fn attach_order_lines(
        &self,
        task_id: &str,
        lines: Vec<PurchaseOrderLine>,
    ) -> Result<(), Cin7Error> {
        let url = self.build_url("purchase/order", &[]);
        let payload = PurchaseOrderPayload {
            task_id: task_id.to_owned(),
            lines,
        };
        // A 2xx is the success signal; the response body echo is not needed.
        self.post_json(&url, &payload).await?;
        Ok(())
    }

    /// Builds a request URL with percent-encoded query parameters.
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self
            .base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone());
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// GET with retry. Returns `Ok(None)` on HTTP 404.
    async fn get_with_retry<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<Option<T>, Cin7Error> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            self.get_json::<T>(url, context)
        })
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<Option<T>, Cin7Error> {
        let response = self
            .client
            .get(url.clone())
            .header("api-auth-accountid", &self.account_id)
            .header("api-auth-applicationkey", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(Cin7Error::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Cin7Error::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        let text = response.text().await?;
        let parsed = serde_json::from_str::<T>(&text).map_err(|e| Cin7Error::Deserialize {
            context: context.to_owned(),
            source: e,
        })?;
        Ok(Some(parsed))
    }

    /// POST returning the raw success body. Non-2xx responses become
    /// [`Cin7Error::UnexpectedStatus`] with the upstream body verbatim.
    async fn post_json<B: serde::Serialize>(
        &self,
        url: &Url,
        body: &B,
    ) -> Result<String, Cin7Error> {
        let response = self
            .client
            .post(url.clone())
            .header("api-auth-accountid", &self.account_id)
            .header("api-auth-applicationkey", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Cin7Error::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
