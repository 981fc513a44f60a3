//! Subcommand implementations and the host-side wiring the engine stays
//! agnostic of: credential-optional clients, file IO, conventions loading.

pub mod matrix;
pub mod order;
pub mod reconcile;

use std::path::Path;

use anyhow::Context;
use cellarman_cin7::Cin7Error;
use cellarman_core::conventions::load_conventions as load_conventions_file;
use cellarman_core::{AppConfig, CatalogProduct, Conventions, LineItem, RawLineItem};
use cellarman_recon::{CatalogSource, SkuLookup};
use cellarman_shopify::{ShopifyClient, ShopifyError};

/// Conventions from the configured YAML override, or the built-in defaults.
pub fn load_conventions(config: &AppConfig) -> anyhow::Result<Conventions> {
    match &config.conventions_path {
        Some(path) => load_conventions_file(path)
            .with_context(|| format!("loading conventions from {}", path.display())),
        None => Ok(Conventions::default()),
    }
}

/// Catalog source that degrades to "no products for any vendor" when
/// Shopify credentials are absent — reconciliation still runs, every line
/// reporting vendor-not-found.
pub struct HostCatalog {
    inner: Option<ShopifyClient>,
}

impl HostCatalog {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let inner = match &config.shopify {
            Some(credentials) => Some(ShopifyClient::new(
                credentials,
                config.http_timeout_secs,
                config.max_retries,
                config.retry_backoff_base_secs,
            )?),
            None => {
                tracing::warn!("no Shopify credentials configured; catalog lookups are disabled");
                None
            }
        };
        Ok(Self { inner })
    }
}

impl CatalogSource for HostCatalog {
    type Error = ShopifyError;

    async fn products_for_vendor(&self, vendor: &str) -> Result<Vec<CatalogProduct>, Self::Error> {
        match &self.inner {
            Some(client) => client.fetch_products_by_vendor(vendor).await,
            None => Ok(Vec::new()),
        }
    }
}

/// Inventory lookup that resolves nothing when Cin7 credentials are absent.
pub struct HostInventory {
    inner: Option<cellarman_cin7::Cin7Client>,
}

impl HostInventory {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let inner = match &config.cin7 {
            Some(credentials) => Some(cellarman_cin7::Cin7Client::new(
                credentials,
                &config.cin7_base_url,
                config.http_timeout_secs,
                config.max_retries,
                config.retry_backoff_base_secs,
            )?),
            None => {
                tracing::warn!("no Cin7 credentials configured; inventory lookups are disabled");
                None
            }
        };
        Ok(Self { inner })
    }
}

impl SkuLookup for HostInventory {
    type Error = Cin7Error;

    async fn product_id_by_sku(&self, sku: &str) -> Result<Option<String>, Self::Error> {
        match &self.inner {
            Some(client) => client.product_id_by_sku(sku).await,
            None => Ok(None),
        }
    }
}

/// Reads a line-item file: either an already-annotated table (a previous
/// run's output) or the raw extraction-stage array.
pub fn read_lines(path: &Path) -> anyhow::Result<Vec<LineItem>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading line items from {}", path.display()))?;

    if let Ok(lines) = serde_json::from_str::<Vec<LineItem>>(&content) {
        return Ok(lines);
    }

    let raw: Vec<RawLineItem> = serde_json::from_str(&content)
        .with_context(|| format!("parsing line items from {}", path.display()))?;
    Ok(raw.into_iter().map(RawLineItem::into_line_item).collect())
}

pub fn write_text(path: &Path, content: &str) -> anyhow::Result<()> {
    std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))
}
