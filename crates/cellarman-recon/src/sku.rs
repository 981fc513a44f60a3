//! Per-location SKU derivation from a matched variant's stock code.
//!
//! The catalog's own SKU convention carries a fixed-length location prefix
//! on every stock code; stripping it yields the base code shared by the
//! sibling SKUs at other locations. That convention is an external contract
//! with the catalog — configured, not derived.

use std::collections::BTreeMap;

use cellarman_core::Conventions;

/// Derives one SKU per configured location from a variant's stock code.
///
/// `"L-ABC123"` with the default conventions yields
/// `{London: "L-ABC123", Gloucester: "G-ABC123"}`. A stock code too short to
/// carry a prefix (length at or below the prefix length) cannot be derived
/// from: the result is empty and the condition is logged, never silently
/// defaulted.
#[must_use]
pub fn derive_location_skus(stock_code: &str, conventions: &Conventions) -> BTreeMap<String, String> {
    let base = match stock_code.get(conventions.sku_prefix_len..) {
        Some(base) if !base.is_empty() => base,
        _ => {
            tracing::warn!(
                stock_code,
                prefix_len = conventions.sku_prefix_len,
                "stock code too short to derive location SKUs"
            );
            return BTreeMap::new();
        }
    };

    conventions
        .locations
        .iter()
        .map(|location| (location.name.clone(), format!("{}{base}", location.prefix)))
        .collect()
}
