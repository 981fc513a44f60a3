//! Fuzzy name similarity between invoice product names and catalog titles.
//!
//! Catalog titles follow a `"L-Supplier / Product / ABV / Format"` composite
//! convention; the comparable product name is the second `/`-delimited
//! segment when one exists. Scoring is a token-order-independent edit
//! distance ratio (0–100) with a flat substring bonus on top — full
//! containment of the invoice name is a stronger signal than token shuffling
//! alone, so the bonus is additive rather than multiplicative.

use crate::conventions::Conventions;

/// Token-order-independent similarity ratio in `[0, 100]`.
///
/// Both inputs are lowercased, stripped to alphanumeric tokens, sorted, and
/// rejoined before the edit-distance comparison, so `"Stout Dark Island"`
/// scores 100 against `"Dark Island Stout"`.
#[must_use]
pub fn token_sort_ratio(a: &str, b: &str) -> u32 {
    let a_sorted = sorted_tokens(a);
    let b_sorted = sorted_tokens(b);
    let ratio = strsim::normalized_levenshtein(&a_sorted, &b_sorted);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled = (ratio * 100.0).round() as u32;
    scaled
}

/// Scores one catalog title against an invoice product name.
///
/// Splits the catalog title on `/` and compares against the second segment
/// when present (stripping the location/vendor prefix convention), then adds
/// the substring bonus when the invoice name is contained case-insensitively
/// in the comparable name. Scores can therefore exceed 100.
#[must_use]
pub fn score_candidate(invoice_name: &str, catalog_title: &str, conventions: &Conventions) -> u32 {
    let comparable = comparable_name(catalog_title);
    let mut score = token_sort_ratio(invoice_name, comparable);
    if !invoice_name.is_empty()
        && comparable
            .to_lowercase()
            .contains(&invoice_name.to_lowercase())
    {
        score += conventions.substring_bonus;
    }
    score
}

/// Extracts the comparable product-name segment from a composite catalog
/// title. Titles without a `/` delimiter are compared whole.
#[must_use]
pub fn comparable_name(catalog_title: &str) -> &str {
    let mut parts = catalog_title.split('/');
    let first = parts.next();
    match parts.next() {
        Some(second) => second.trim(),
        None => first.map_or(catalog_title, str::trim),
    }
}

fn sorted_tokens(s: &str) -> String {
    let cleaned: String = s
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}
