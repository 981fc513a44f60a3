//! Domain records shared across the reconciliation pipeline.
//!
//! Line items arrive from the extraction stage as loosely-typed JSON; every
//! field may be missing, empty, `"nan"`, or `"none"`. [`RawLineItem`] models
//! that wire shape and [`RawLineItem::into_line_item`] is the single place
//! where defaults are applied — downstream code works with [`LineItem`] and
//! never re-checks for sentinel strings.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Terminal reconciliation state of one line item.
///
/// Set once per run by the variant matcher; a human edit plus a re-run is the
/// only way a line changes state afterwards. Presentation glyphs (check marks
/// and the like) are a rendering concern — [`ReconcileStatus::label`] is the
/// canonical text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileStatus {
    /// Not yet checked in any run.
    #[default]
    Pending,
    /// A product + variant with compatible pack and volume was found.
    Matched,
    /// At least one plausible product existed but no variant fit the size.
    SizeMissing,
    /// The vendor has products, none of which resemble this line.
    NewProduct,
    /// The vendor query returned zero catalog products.
    VendorNotFound,
}

impl ReconcileStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ReconcileStatus::Pending => "Pending",
            ReconcileStatus::Matched => "Matched",
            ReconcileStatus::SizeMissing => "Size Missing",
            ReconcileStatus::NewProduct => "New Product",
            ReconcileStatus::VendorNotFound => "Vendor Not Found",
        }
    }
}

impl std::fmt::Display for ReconcileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One purchased product/format/pack combination from an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub supplier_name: String,
    /// Collaboration partner extracted from names like `"STF/Croft"`.
    #[serde(default)]
    pub collaborator: Option<String>,
    pub product_name: String,
    /// Free-text ABV as extracted, e.g. `"4.5%"`.
    #[serde(default)]
    pub abv: Option<String>,
    /// Packaging format, e.g. `"Steel Keg"`, `"Cask"`, `"Cans"`.
    pub format: String,
    /// Raw pack size as extracted. `None` for kegs and casks. Normalized on
    /// demand via [`crate::normalize::normalize_pack`]; never stored as `"1"`.
    #[serde(default)]
    pub pack_size: Option<String>,
    /// Volume with its unit suffix, e.g. `"50cl"`, `"30 Litre"`. Comparable
    /// only after [`crate::normalize::normalize_volume`].
    pub volume: String,
    pub quantity: Decimal,
    /// Net price per purchase unit (case or keg) — never pre-divided by pack
    /// size.
    pub unit_price: Decimal,
    #[serde(default)]
    pub status: ReconcileStatus,
    /// Catalog product title of the winning candidate, location prefix
    /// stripped. Audit only.
    #[serde(default)]
    pub matched_product_name: Option<String>,
    /// Variant title of the winning variant, e.g. `"24 x 33cl"`. Audit only.
    #[serde(default)]
    pub matched_variant_name: Option<String>,
    #[serde(default)]
    pub matched_image_url: Option<String>,
    /// Location name → SKU derived from the matched variant's stock code.
    /// Empty when the line is unmatched or the stock code was too short to
    /// derive from.
    #[serde(default)]
    pub location_stock_codes: BTreeMap<String, String>,
    /// Location name → inventory-system product ID for the derived SKU.
    /// `None` means the lookup ran and found nothing — an expected outcome
    /// for SKUs not yet created in the inventory system.
    #[serde(default)]
    pub external_product_ids: BTreeMap<String, Option<String>>,
}

impl LineItem {
    /// Resets every field populated by a reconciliation run back to its
    /// pre-run state. Used when re-processing a previously matched line.
    pub fn clear_match(&mut self) {
        self.status = ReconcileStatus::Pending;
        self.matched_product_name = None;
        self.matched_variant_name = None;
        self.matched_image_url = None;
        self.location_stock_codes.clear();
        self.external_product_ids.clear();
    }
}

/// A line item exactly as the extraction stage emits it: every field
/// optional, numbers possibly serialized as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLineItem {
    #[serde(default)]
    pub supplier_name: Option<String>,
    #[serde(default)]
    pub collaborator: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub abv: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub pack_size: Option<serde_json::Value>,
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub quantity: Option<serde_json::Value>,
    #[serde(default)]
    pub item_price: Option<serde_json::Value>,
}

impl RawLineItem {
    /// Converts the loose extraction record into a [`LineItem`], applying
    /// defaults once at the ingestion boundary.
    ///
    /// Missing or sentinel text fields become empty strings / `None`;
    /// unparseable numbers become zero. A degraded line classifies as a weak
    /// or failed match downstream rather than crashing the run.
    #[must_use]
    pub fn into_line_item(self) -> LineItem {
        LineItem {
            supplier_name: clean_text(self.supplier_name).unwrap_or_default(),
            collaborator: clean_text(self.collaborator),
            product_name: clean_text(self.product_name).unwrap_or_default(),
            abv: clean_text(self.abv),
            format: clean_text(self.format).unwrap_or_default(),
            pack_size: self.pack_size.as_ref().and_then(value_to_text),
            volume: clean_text(self.volume).unwrap_or_default(),
            quantity: self
                .quantity
                .as_ref()
                .and_then(value_to_decimal)
                .unwrap_or_default(),
            unit_price: self
                .item_price
                .as_ref()
                .and_then(value_to_decimal)
                .unwrap_or_default(),
            status: ReconcileStatus::Pending,
            matched_product_name: None,
            matched_variant_name: None,
            matched_image_url: None,
            location_stock_codes: BTreeMap::new(),
            external_product_ids: BTreeMap::new(),
        }
    }
}

/// Invoice-level header record from the extraction stage. Carried through for
/// export and supplier resolution; never interpreted by the matcher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceHeader {
    #[serde(default)]
    pub payable_to: Option<String>,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub invoice_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub net_total: Option<Decimal>,
    #[serde(default)]
    pub vat_total: Option<Decimal>,
    #[serde(default)]
    pub gross_total: Option<Decimal>,
}

/// A vendor's product as known to the e-commerce catalog. Read-only snapshot,
/// fetched per vendor per run and discarded afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: String,
    /// Composite title, frequently `"L-Supplier / Product / ABV / Format"`.
    pub title: String,
    /// Catalog publication status. Carried for audit, never filtered on —
    /// draft and archived products are valid match targets.
    #[serde(default)]
    pub status: Option<String>,
    /// Format metafield, e.g. `"Steel Keg"`.
    #[serde(default)]
    pub format_meta: Option<String>,
    /// Keg-type metafield, e.g. `"KeyKeg"`.
    #[serde(default)]
    pub keg_type_meta: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub variants: Vec<CatalogVariant>,
}

/// One packaging/size option of a [`CatalogProduct`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogVariant {
    pub id: String,
    /// Free text encoding pack × volume, e.g. `"12 x 33cl"` or `"30 Litre"`.
    pub title: String,
    /// SKU; the first two characters, when the remainder is non-empty, are a
    /// location prefix (see SKU derivation).
    #[serde(default)]
    pub stock_code: Option<String>,
    #[serde(default)]
    pub available_quantity: Option<i64>,
}

/// Maps empty / `"nan"` / `"none"` / `"null"` text to `None`, trimming
/// whitespace otherwise.
fn clean_text(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_lowercase();
    if lower == "nan" || lower == "none" || lower == "null" {
        return None;
    }
    Some(trimmed.to_string())
}

/// Extracts a text form from a JSON value that may be a string or a number.
fn value_to_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => clean_text(Some(s.clone())),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parses a JSON string or number into a [`Decimal`]. Currency symbols and
/// thousands separators are stripped before parsing.
fn value_to_decimal(value: &serde_json::Value) -> Option<Decimal> {
    let text = match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<Decimal>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_from_json(json: &str) -> RawLineItem {
        serde_json::from_str(json).expect("raw line should deserialize")
    }

    #[test]
    fn status_default_is_pending() {
        assert_eq!(ReconcileStatus::default(), ReconcileStatus::Pending);
    }

    #[test]
    fn status_labels() {
        assert_eq!(ReconcileStatus::Matched.label(), "Matched");
        assert_eq!(ReconcileStatus::SizeMissing.label(), "Size Missing");
        assert_eq!(ReconcileStatus::VendorNotFound.label(), "Vendor Not Found");
    }

    #[test]
    fn into_line_item_defaults_missing_fields() {
        let raw = raw_from_json(r#"{"supplier_name": "Acme Brew"}"#);
        let line = raw.into_line_item();
        assert_eq!(line.supplier_name, "Acme Brew");
        assert_eq!(line.product_name, "");
        assert!(line.pack_size.is_none());
        assert_eq!(line.quantity, Decimal::ZERO);
        assert_eq!(line.status, ReconcileStatus::Pending);
    }

    #[test]
    fn into_line_item_cleans_sentinel_text() {
        let raw = raw_from_json(
            r#"{"supplier_name": "Acme", "collaborator": "nan", "abv": "None", "product_name": "  Pale Ale  "}"#,
        );
        let line = raw.into_line_item();
        assert!(line.collaborator.is_none());
        assert!(line.abv.is_none());
        assert_eq!(line.product_name, "Pale Ale");
    }

    #[test]
    fn into_line_item_accepts_numeric_or_string_numbers() {
        let raw = raw_from_json(
            r#"{"supplier_name": "Acme", "quantity": 3, "item_price": "108.50", "pack_size": 24}"#,
        );
        let line = raw.into_line_item();
        assert_eq!(line.quantity, Decimal::from(3));
        assert_eq!(line.unit_price, "108.50".parse::<Decimal>().unwrap());
        assert_eq!(line.pack_size.as_deref(), Some("24"));
    }

    #[test]
    fn into_line_item_strips_currency_symbols() {
        let raw = raw_from_json(r#"{"supplier_name": "Acme", "item_price": "£1,080.00"}"#);
        let line = raw.into_line_item();
        assert_eq!(line.unit_price, "1080.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn clear_match_resets_run_fields() {
        let raw = raw_from_json(r#"{"supplier_name": "Acme", "product_name": "Pale Ale"}"#);
        let mut line = raw.into_line_item();
        line.status = ReconcileStatus::Matched;
        line.matched_variant_name = Some("24 x 33cl".to_string());
        line.location_stock_codes
            .insert("London".to_string(), "L-PA24".to_string());
        line.clear_match();
        assert_eq!(line.status, ReconcileStatus::Pending);
        assert!(line.matched_variant_name.is_none());
        assert!(line.location_stock_codes.is_empty());
    }

    #[test]
    fn line_item_round_trips_through_json() {
        let raw = raw_from_json(
            r#"{"supplier_name": "Acme", "product_name": "Pale Ale", "format": "Cans", "volume": "330ml", "quantity": 2, "item_price": "54.00"}"#,
        );
        let line = raw.into_line_item();
        let json = serde_json::to_string(&line).unwrap();
        let back: LineItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back.product_name, "Pale Ale");
        assert_eq!(back.unit_price, line.unit_price);
        assert_eq!(back.status, ReconcileStatus::Pending);
    }
}
