//! Canonical forms for free-text pack and volume strings.
//!
//! Invoice volumes arrive in whatever vocabulary the supplier uses — `440ml`,
//! `44cl`, `30 Litre`, `9 Gallon` — and pack sizes arrive as numbers, numeric
//! strings, spreadsheet float artefacts (`24.0`), or nothing at all. These
//! functions reduce both to single comparable strings. They are deliberately
//! unit-blind beyond the ml→cl conversion: Litres vs centilitres are resolved
//! by the matcher's tolerance rules, not here.
//!
//! Both functions degrade instead of failing: garbage in yields the sentinel
//! (`"0"` for volume, `"1"` for pack), which the matcher classifies as a weak
//! or failed match.

/// Extracts the first numeric token of `raw` and returns it as a canonical
/// string, converting millilitres to centilitres.
///
/// - `"440ml"` → `"44"`, `"44cl"` → `"44"`, `"30 Litre"` → `"30"`
/// - `"4.5 Gallon"` → `"4.5"` (decimals preserved, trailing `.0` dropped)
/// - no numeric token → `"0"`
///
/// Idempotent on its own output: a bare number passes through unchanged.
#[must_use]
pub fn normalize_volume(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    let Some(token) = first_numeric_token(&lower) else {
        return "0".to_string();
    };
    let Ok(mut value) = token.parse::<f64>() else {
        return "0".to_string();
    };
    if lower.contains("ml") {
        value /= 10.0;
    }
    // f64 Display renders 44.0 as "44" and 4.5 as "4.5", which is exactly
    // the canonical form wanted here.
    value.to_string()
}

/// Canonicalizes a raw pack-size string. `"1"` is the sentinel for "not a
/// multi-pack": absent, empty, `"0"`, `"nan"`, and `"none"` all map to it.
/// Spreadsheet float artefacts (`"24.0"`) lose the trailing `.0`.
///
/// Matching logic must treat `"1"` specially — it means "the variant title
/// carries no `N x` multiplier", never a literal `1 x` search.
#[must_use]
pub fn normalize_pack(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "1".to_string();
    };
    let trimmed = raw.trim();
    let stripped = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    let lower = stripped.to_lowercase();
    if lower.is_empty() || lower == "0" || lower == "nan" || lower == "none" {
        return "1".to_string();
    }
    stripped.to_string()
}

/// Scans for the first run of ASCII digits with at most one embedded decimal
/// point. Returns `None` when the input contains no digits.
fn first_numeric_token(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut i = 0usize;

    while i < len {
        if bytes[i].is_ascii_digit() {
            let start = i;
            let mut has_dot = false;
            while i < len {
                if bytes[i].is_ascii_digit() {
                    i += 1;
                } else if bytes[i] == b'.' && !has_dot && i + 1 < len && bytes[i + 1].is_ascii_digit()
                {
                    has_dot = true;
                    i += 1;
                } else {
                    break;
                }
            }
            return Some(&s[start..i]);
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_ml_divides_by_ten() {
        assert_eq!(normalize_volume("440ml"), "44");
        assert_eq!(normalize_volume("500mL"), "50");
        assert_eq!(normalize_volume("330 ml"), "33");
    }

    #[test]
    fn volume_cl_passes_through() {
        assert_eq!(normalize_volume("44cl"), "44");
        assert_eq!(normalize_volume("50cl"), "50");
    }

    #[test]
    fn volume_ml_and_cl_forms_agree() {
        assert_eq!(normalize_volume("440ml"), normalize_volume("44cl"));
    }

    #[test]
    fn volume_litres_keep_value() {
        assert_eq!(normalize_volume("30 Litre"), "30");
        assert_eq!(normalize_volume("20L"), "20");
    }

    #[test]
    fn volume_gallons_preserve_decimals() {
        assert_eq!(normalize_volume("9 Gallon"), "9");
        assert_eq!(normalize_volume("4.5 Gallon"), "4.5");
    }

    #[test]
    fn volume_no_number_is_zero() {
        assert_eq!(normalize_volume(""), "0");
        assert_eq!(normalize_volume("Firkin"), "0");
    }

    #[test]
    fn volume_idempotent_on_own_output() {
        for raw in ["440ml", "44cl", "30 Litre", "4.5 Gallon", "", "Firkin"] {
            let once = normalize_volume(raw);
            assert_eq!(normalize_volume(&once), once, "input was {raw:?}");
        }
    }

    #[test]
    fn pack_sentinels_become_one() {
        assert_eq!(normalize_pack(None), "1");
        assert_eq!(normalize_pack(Some("")), "1");
        assert_eq!(normalize_pack(Some("0")), "1");
        assert_eq!(normalize_pack(Some("nan")), "1");
        assert_eq!(normalize_pack(Some("None")), "1");
    }

    #[test]
    fn pack_strips_float_artefact() {
        assert_eq!(normalize_pack(Some("24.0")), "24");
        assert_eq!(normalize_pack(Some("12")), "12");
    }

    #[test]
    fn pack_zero_float_artefact_is_sentinel() {
        assert_eq!(normalize_pack(Some("0.0")), "1");
    }

    #[test]
    fn first_numeric_token_handles_embedded_numbers() {
        assert_eq!(first_numeric_token("abv 4.5% keg"), Some("4.5"));
        assert_eq!(first_numeric_token("no digits"), None);
        assert_eq!(first_numeric_token("12x440ml"), Some("12"));
    }
}
