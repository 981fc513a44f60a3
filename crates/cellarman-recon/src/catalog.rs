//! Catalog access behind a trait, plus the per-run vendor cache.
//!
//! The orchestrator fetches each distinct vendor's product list exactly once
//! per run, bounding catalog calls to O(distinct vendors) rather than
//! O(line items). The cache is run-scoped by construction: it lives inside
//! one `reconcile` call and is dropped with it.

use std::collections::HashMap;

use cellarman_core::CatalogProduct;
use cellarman_shopify::{ShopifyClient, ShopifyError};

/// Anything that can list a vendor's catalog products. Implemented by the
/// Shopify client for production and by in-memory fixtures in tests.
#[allow(async_fn_in_trait)]
pub trait CatalogSource {
    type Error: std::fmt::Display;

    /// Returns every catalog product for `vendor`. An unknown vendor is an
    /// empty list, not an error.
    async fn products_for_vendor(&self, vendor: &str) -> Result<Vec<CatalogProduct>, Self::Error>;
}

impl CatalogSource for ShopifyClient {
    type Error = ShopifyError;

    async fn products_for_vendor(&self, vendor: &str) -> Result<Vec<CatalogProduct>, Self::Error> {
        self.fetch_products_by_vendor(vendor).await
    }
}

/// Vendor name → product list, built once per reconciliation run.
#[derive(Default)]
pub struct VendorCache {
    products: HashMap<String, Vec<CatalogProduct>>,
}

impl VendorCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, vendor: &str, products: Vec<CatalogProduct>) {
        self.products.insert(vendor.to_owned(), products);
    }

    /// Candidate list for a vendor. Vendors that were never fetched (or
    /// fetched empty) yield an empty slice, which the matcher reports as
    /// vendor-not-found.
    #[must_use]
    pub fn candidates(&self, vendor: &str) -> &[CatalogProduct] {
        self.products.get(vendor).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, vendor: &str) -> bool {
        self.products.contains_key(vendor)
    }
}
