//! The per-run reconciliation pipeline.
//!
//! One call to [`reconcile`] owns the whole run: it prefetches each distinct
//! supplier's catalog once, drives the matcher per line item, derives
//! per-location SKUs and resolves their inventory IDs on a match, and
//! returns the annotated table together with the run's audit log. There is
//! no ambient state — re-running with an unchanged catalog recomputes the
//! same result.
//!
//! A failed catalog or inventory lookup degrades to "nothing found" for that
//! one supplier or SKU and is logged; it never aborts the batch.

use cellarman_cin7::{Cin7Client, Cin7Error};
use cellarman_core::normalize::{normalize_pack, normalize_volume};
use cellarman_core::{Conventions, LineItem, ReconcileStatus};

use crate::catalog::{CatalogSource, VendorCache};
use crate::matcher::{match_line, MatchOutcome};
use crate::sku::derive_location_skus;

/// Anything that can resolve a stock code to an inventory-system product ID.
#[allow(async_fn_in_trait)]
pub trait SkuLookup {
    type Error: std::fmt::Display;

    /// `Ok(None)` means the lookup ran and found nothing — an expected
    /// outcome for SKUs not yet created in the inventory system.
    async fn product_id_by_sku(&self, sku: &str) -> Result<Option<String>, Self::Error>;
}

impl SkuLookup for Cin7Client {
    type Error = Cin7Error;

    async fn product_id_by_sku(&self, sku: &str) -> Result<Option<String>, Self::Error> {
        Cin7Client::product_id_by_sku(self, sku).await
    }
}

/// Inventory lookup for running without Cin7 credentials: every SKU is
/// unresolved.
pub struct NullInventory;

impl SkuLookup for NullInventory {
    type Error = std::convert::Infallible;

    async fn product_id_by_sku(&self, _sku: &str) -> Result<Option<String>, Self::Error> {
        Ok(None)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// Re-process lines that are already `Matched`. Off by default: a
    /// successful prior match is preserved and its lookups are not repeated.
    pub refresh_matched: bool,
}

/// The annotated line-item table plus the run's ordered audit log.
#[derive(Debug)]
pub struct ReconcileReport {
    pub lines: Vec<LineItem>,
    pub audit: Vec<String>,
}

/// Runs reconciliation over the whole batch.
pub async fn reconcile<C, S>(
    mut lines: Vec<LineItem>,
    catalog: &C,
    inventory: &S,
    conventions: &Conventions,
    options: ReconcileOptions,
) -> ReconcileReport
where
    C: CatalogSource,
    S: SkuLookup,
{
    let mut audit: Vec<String> = Vec::new();

    let should_process =
        |line: &LineItem| options.refresh_matched || line.status != ReconcileStatus::Matched;

    // Distinct suppliers for the lines this run will touch, in first-seen
    // order. One catalog fetch per supplier, not per line.
    let mut suppliers: Vec<String> = Vec::new();
    for line in lines.iter().filter(|l| should_process(l)) {
        if !line.supplier_name.is_empty() && !suppliers.contains(&line.supplier_name) {
            suppliers.push(line.supplier_name.clone());
        }
    }

    let mut cache = VendorCache::new();
    let total = suppliers.len();
    for (index, supplier) in suppliers.iter().enumerate() {
        tracing::info!(supplier = %supplier, progress = index + 1, total, "fetching catalog products");
        audit.push(format!("Searching catalog for supplier '{supplier}'"));
        match catalog.products_for_vendor(supplier).await {
            Ok(products) => {
                audit.push(format!("  found {} products", products.len()));
                cache.insert(supplier, products);
            }
            Err(e) => {
                tracing::warn!(supplier = %supplier, error = %e, "catalog lookup failed");
                audit.push(format!(
                    "  catalog lookup failed ({e}) — treating as no products"
                ));
                cache.insert(supplier, Vec::new());
            }
        }
    }

    for line in &mut lines {
        if !should_process(line) {
            continue;
        }
        line.clear_match();

        let pack = normalize_pack(line.pack_size.as_deref());
        let volume = normalize_volume(&line.volume);
        audit.push(format!(
            "Checking '{}' (pack {pack}, vol {volume}) [{}]",
            line.product_name, line.supplier_name
        ));

        let outcome = match_line(line, cache.candidates(&line.supplier_name), conventions, &mut audit);
        apply_outcome(line, outcome, inventory, conventions, &mut audit).await;
    }

    ReconcileReport { lines, audit }
}

async fn apply_outcome<S: SkuLookup>(
    line: &mut LineItem,
    outcome: MatchOutcome,
    inventory: &S,
    conventions: &Conventions,
    audit: &mut Vec<String>,
) {
    match outcome {
        MatchOutcome::Matched(matched) => {
            line.status = ReconcileStatus::Matched;
            line.matched_product_name = Some(matched.product_name);
            line.matched_variant_name = Some(matched.variant_title.clone());
            line.matched_image_url = matched.image_url;

            if let Some(stock_code) = matched.stock_code.as_deref() {
                line.location_stock_codes = derive_location_skus(stock_code, conventions);
            } else {
                tracing::warn!(
                    variant = %matched.variant_title,
                    "matched variant carries no stock code; no SKUs derived"
                );
            }

            for (location, sku) in line.location_stock_codes.clone() {
                let resolved = match inventory.product_id_by_sku(&sku).await {
                    Ok(id) => id,
                    Err(e) => {
                        tracing::warn!(sku = %sku, error = %e, "inventory lookup failed");
                        audit.push(format!(
                            "  inventory lookup failed for {sku} ({e}) — treating as not found"
                        ));
                        None
                    }
                };
                line.external_product_ids.insert(location, resolved);
            }

            let skus: Vec<&str> = line
                .location_stock_codes
                .values()
                .map(String::as_str)
                .collect();
            audit.push(format!(
                "  -> Matched '{}' (SKUs: {})",
                matched.variant_title,
                if skus.is_empty() {
                    "none derived".to_string()
                } else {
                    skus.join(", ")
                }
            ));
        }
        MatchOutcome::SizeMissing { best_score } => {
            line.status = ReconcileStatus::SizeMissing;
            audit.push(format!("  -> Size Missing (best score {best_score}%)"));
        }
        MatchOutcome::NewProduct => {
            line.status = ReconcileStatus::NewProduct;
            audit.push("  -> New Product".to_string());
        }
        MatchOutcome::VendorNotFound => {
            line.status = ReconcileStatus::VendorNotFound;
            audit.push("  -> Vendor Not Found".to_string());
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
