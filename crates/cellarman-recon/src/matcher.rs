//! Per-line-item matching: scoring, format-family guard, variant scan.
//!
//! The whole decision is a pure function over the line item and its vendor's
//! cached candidate list, returning a discriminated [`MatchOutcome`]. The
//! precedence order is an explicit contract:
//!
//! 1. no candidates at all → `VendorNotFound`;
//! 2. candidates are scored, those at or below the noise floor discarded;
//! 3. candidates at or above the acceptance threshold are walked in rank
//!    order — the format-family guard can skip a candidate outright, and the
//!    first variant passing both the pack and volume checks wins;
//! 4. nothing won: `SizeMissing` if anything survived the noise floor,
//!    otherwise `NewProduct`.
//!
//! Candidates scoring between the noise floor and the acceptance threshold
//! are never format/variant-checked, but their existence is what separates
//! `SizeMissing` from `NewProduct`.

use cellarman_core::normalize::{normalize_pack, normalize_volume};
use cellarman_core::similarity::score_candidate;
use cellarman_core::{CatalogProduct, CatalogVariant, Conventions, LineItem};

/// The winning product + variant and the audit fields that go with it.
#[derive(Debug, Clone)]
pub struct MatchedVariant {
    /// Catalog title with any location prefix stripped, for the audit trail.
    pub product_name: String,
    pub variant_id: String,
    pub variant_title: String,
    pub stock_code: Option<String>,
    pub image_url: Option<String>,
    pub score: u32,
}

/// Terminal result of matching one line item.
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    Matched(MatchedVariant),
    /// Some candidate survived the noise floor but no variant fit.
    SizeMissing { best_score: u32 },
    /// No candidate scored above the noise floor.
    NewProduct,
    /// The vendor query returned zero catalog products.
    VendorNotFound,
}

/// Runs the matching state machine for one line item against its vendor's
/// candidate list, appending per-candidate narration to `audit`.
#[must_use]
pub fn match_line(
    line: &LineItem,
    candidates: &[CatalogProduct],
    conventions: &Conventions,
    audit: &mut Vec<String>,
) -> MatchOutcome {
    if candidates.is_empty() {
        return MatchOutcome::VendorNotFound;
    }

    let pack = normalize_pack(line.pack_size.as_deref());
    let volume = normalize_volume(&line.volume);

    // Score everything once; the stable sort keeps catalog fetch order as
    // the tie-break (first seen wins).
    let mut scored: Vec<(u32, &CatalogProduct)> = candidates
        .iter()
        .map(|product| {
            (
                score_candidate(&line.product_name, &product.title, conventions),
                product,
            )
        })
        .filter(|(score, _)| *score > conventions.noise_floor)
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    if scored.is_empty() {
        audit.push(format!(
            "  no candidate above the {} noise floor for '{}'",
            conventions.noise_floor, line.product_name
        ));
        return MatchOutcome::NewProduct;
    }

    let best_score = scored[0].0;

    for (score, product) in scored
        .iter()
        .filter(|(score, _)| *score >= conventions.accept_threshold)
    {
        if !format_compatible(&line.format, product) {
            audit.push(format!(
                "  skipped '{}' ({score}%) — format family incompatible with '{}'",
                product.title, line.format
            ));
            continue;
        }

        audit.push(format!("  checking candidate '{}' ({score}%)", product.title));

        for variant in &product.variants {
            let title_lower = variant.title.to_lowercase();
            if pack_ok(&pack, &title_lower) && vol_ok(&volume, &title_lower, conventions) {
                audit.push(format!("    matched variant '{}'", variant.title));
                return MatchOutcome::Matched(matched_variant(product, variant, *score, conventions));
            }
            audit.push(format!("    variant '{}' failed size check", variant.title));
        }
    }

    MatchOutcome::SizeMissing { best_score }
}

fn matched_variant(
    product: &CatalogProduct,
    variant: &CatalogVariant,
    score: u32,
    conventions: &Conventions,
) -> MatchedVariant {
    MatchedVariant {
        product_name: strip_location_prefix(&product.title, conventions).to_owned(),
        variant_id: variant.id.clone(),
        variant_title: variant.title.clone(),
        stock_code: variant.stock_code.clone(),
        image_url: product.image_url.clone(),
        score,
    }
}

/// Strips a configured location prefix (`"L-"`, `"G-"`, …) from the front of
/// a catalog title when present.
fn strip_location_prefix<'a>(title: &'a str, conventions: &Conventions) -> &'a str {
    for location in &conventions.locations {
        if let Some(stripped) = title.strip_prefix(location.prefix.as_str()) {
            return stripped;
        }
    }
    title
}

/// Format-family compatibility guard, checked before any variant is scanned.
///
/// Judged against the combined lowercase text of the candidate's format
/// metadata, keg-type metadata, and title. Incompatible pairs are blocking:
/// a steel keg can never be fulfilled by a KeyKeg product however well the
/// names score.
fn format_compatible(invoice_format: &str, product: &CatalogProduct) -> bool {
    let invoice = invoice_format.to_lowercase();
    let combined = format!(
        "{} {} {}",
        product.format_meta.as_deref().unwrap_or(""),
        product.keg_type_meta.as_deref().unwrap_or(""),
        product.title
    )
    .to_lowercase();

    if invoice.contains("steel")
        && ["keykeg", "poly", "dolium"]
            .iter()
            .any(|k| combined.contains(k))
    {
        return false;
    }
    if invoice.contains("keykeg")
        && ["steel", "stainless"].iter().any(|k| combined.contains(k))
    {
        return false;
    }
    if (invoice.contains("cask") || invoice.contains("firkin"))
        && combined.contains("keg")
        && !combined.contains("cask")
    {
        return false;
    }
    true
}

/// Pack compatibility against a lowercased variant title.
///
/// `"1"` is the not-multi-packed sentinel and demands the *absence* of an
/// `" x "` multiplier; any other pack demands its own `"N x"` / `"Nx"` token.
fn pack_ok(pack: &str, variant_title_lower: &str) -> bool {
    if pack == "1" {
        !variant_title_lower.contains(" x ")
    } else {
        variant_title_lower.contains(&format!("{pack} x"))
            || variant_title_lower.contains(&format!("{pack}x"))
    }
}

/// Volume compatibility against a lowercased variant title.
///
/// Verbatim containment of the normalized volume, the precision-tolerant
/// trailing-zero form (`"5"` → `"50"`), or one of the Imperial cask aliases
/// (firkin/pin) from the conventions table.
fn vol_ok(volume: &str, variant_title_lower: &str, conventions: &Conventions) -> bool {
    if variant_title_lower.contains(volume) {
        return true;
    }
    if variant_title_lower.contains(&format!("{volume}0")) {
        return true;
    }
    if let Some(keyword) = conventions.cask_keyword(volume) {
        if variant_title_lower.contains(keyword) {
            return true;
        }
    }
    false
}

#[cfg(test)]
#[path = "matcher_test.rs"]
mod tests;
