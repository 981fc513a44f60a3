//! Site conventions: tunable thresholds and hard-coded business mappings.
//!
//! The two-character SKU location prefix, the warehouse location table, and
//! the Imperial-cask volume alias table are site-specific conventions, not
//! derivable facts. They live here as data — with the production defaults
//! baked into [`Conventions::default`] — and can be overridden from a YAML
//! file for confirmation with the domain owner.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A warehouse location and the SKU prefix that identifies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCode {
    pub name: String,
    /// Fixed prefix prepended to the base stock code, e.g. `"L-"`.
    pub prefix: String,
}

/// One entry of the Imperial-cask aliasing table: a normalized volume string
/// that matches a variant title containing `keyword`.
///
/// A firkin is 9 Imperial gallons (≈41 L); a pin is 4.5 (≈20.5 L). Invoices
/// express these as gallons, catalog variants as litres or cask names, so
/// the two vocabularies only meet through this table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaskAlias {
    pub volume: String,
    pub keyword: String,
}

/// Thresholds and site mappings consumed across the matching pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conventions {
    /// Candidates scoring at or below this are discarded as noise.
    pub noise_floor: u32,
    /// Candidates must score at or above this to be format/variant-checked.
    pub accept_threshold: u32,
    /// Flat bonus added when the invoice name is contained in the catalog name.
    pub substring_bonus: u32,
    /// Minimum fuzzy score for the supplier-directory fallback. Strict — this
    /// choice decides which supplier gets paid.
    pub supplier_fuzzy_threshold: u32,
    /// Leading characters of a stock code that form the location prefix.
    pub sku_prefix_len: usize,
    pub locations: Vec<LocationCode>,
    pub cask_aliases: Vec<CaskAlias>,
    /// Tax rule name stamped on every purchase-order line.
    pub tax_rule: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Conventions {
            noise_floor: 40,
            accept_threshold: 75,
            substring_bonus: 10,
            supplier_fuzzy_threshold: 90,
            sku_prefix_len: 2,
            locations: vec![
                LocationCode {
                    name: "London".to_string(),
                    prefix: "L-".to_string(),
                },
                LocationCode {
                    name: "Gloucester".to_string(),
                    prefix: "G-".to_string(),
                },
            ],
            cask_aliases: vec![
                CaskAlias {
                    volume: "9".to_string(),
                    keyword: "firkin".to_string(),
                },
                CaskAlias {
                    volume: "40".to_string(),
                    keyword: "firkin".to_string(),
                },
                CaskAlias {
                    volume: "41".to_string(),
                    keyword: "firkin".to_string(),
                },
                CaskAlias {
                    volume: "4".to_string(),
                    keyword: "pin".to_string(),
                },
                CaskAlias {
                    volume: "4.5".to_string(),
                    keyword: "pin".to_string(),
                },
                CaskAlias {
                    volume: "20".to_string(),
                    keyword: "pin".to_string(),
                },
                CaskAlias {
                    volume: "21".to_string(),
                    keyword: "pin".to_string(),
                },
            ],
            tax_rule: "Tax on Purchases".to_string(),
        }
    }
}

impl Conventions {
    /// Returns the cask-alias keyword for a normalized volume, if the volume
    /// is one of the known Imperial cask sizes.
    #[must_use]
    pub fn cask_keyword(&self, normalized_volume: &str) -> Option<&str> {
        self.cask_aliases
            .iter()
            .find(|alias| alias.volume == normalized_volume)
            .map(|alias| alias.keyword.as_str())
    }
}

/// Loads conventions from a YAML file and validates them. Fields omitted from
/// the file keep their defaults.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_conventions(path: &Path) -> Result<Conventions, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ConventionsIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let conventions: Conventions = serde_yaml::from_str(&content)?;
    validate_conventions(&conventions)?;
    Ok(conventions)
}

fn validate_conventions(conventions: &Conventions) -> Result<(), ConfigError> {
    if conventions.locations.is_empty() {
        return Err(ConfigError::Validation(
            "at least one location must be configured".to_string(),
        ));
    }
    for location in &conventions.locations {
        if location.name.trim().is_empty() || location.prefix.is_empty() {
            return Err(ConfigError::Validation(format!(
                "location '{}' must have a non-empty name and prefix",
                location.name
            )));
        }
    }
    if conventions.sku_prefix_len == 0 {
        return Err(ConfigError::Validation(
            "sku_prefix_len must be at least 1".to_string(),
        ));
    }
    if conventions.noise_floor >= conventions.accept_threshold {
        return Err(ConfigError::Validation(format!(
            "noise_floor ({}) must be below accept_threshold ({})",
            conventions.noise_floor, conventions.accept_threshold
        )));
    }
    Ok(())
}
