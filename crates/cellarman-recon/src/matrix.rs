//! The missing-products worklist: unmatched lines collapsed into one row per
//! beer, with up to three packaging slots each.
//!
//! The worklist is a human-facing to-do table for manual catalog creation;
//! capping the packaging fan-out at three keeps it readable. Groups with
//! more distinct packagings drop the excess — a documented limitation of the
//! table shape, logged but not an error.

use cellarman_core::normalize::normalize_pack;
use cellarman_core::{LineItem, ReconcileStatus};
use rust_decimal::Decimal;

/// Packaging slots per worklist row.
pub const MAX_PACKAGING_SLOTS: usize = 3;

/// One distinct packaging of a beer awaiting creation, with a progress flag
/// the operator toggles as catalog entries are created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagingSlot {
    pub format: String,
    /// Normalized pack size (`"1"` for non-multi-packed).
    pub pack_size: String,
    pub volume: String,
    pub unit_price: Decimal,
    pub created: bool,
}

/// One worklist row: a beer identity and its packaging slots.
#[derive(Debug, Clone)]
pub struct MatrixRow {
    pub supplier_name: String,
    pub collaborator: Option<String>,
    pub product_name: String,
    pub abv: Option<String>,
    pub slots: Vec<PackagingSlot>,
}

impl MatrixRow {
    fn identity_matches(&self, line: &LineItem) -> bool {
        self.supplier_name == line.supplier_name
            && self.collaborator == line.collaborator
            && self.product_name == line.product_name
            && self.abv == line.abv
    }
}

/// Builds the worklist from a reconciled line-item table.
///
/// Rows whose status is `Matched` are excluded; the rest group by
/// (supplier, collaborator, product name, ABV) — the identity of "the same
/// beer" independent of packaging — in first-seen order. Within a group,
/// distinct (format, pack, volume, price) combinations fill up to
/// [`MAX_PACKAGING_SLOTS`] slots; duplicates collapse, overflow is dropped.
#[must_use]
pub fn build_matrix(lines: &[LineItem]) -> Vec<MatrixRow> {
    let mut rows: Vec<MatrixRow> = Vec::new();

    for line in lines.iter().filter(|l| l.status != ReconcileStatus::Matched) {
        let slot = PackagingSlot {
            format: line.format.clone(),
            pack_size: normalize_pack(line.pack_size.as_deref()),
            volume: line.volume.clone(),
            unit_price: line.unit_price,
            created: false,
        };

        let index = match rows.iter().position(|row| row.identity_matches(line)) {
            Some(index) => index,
            None => {
                rows.push(MatrixRow {
                    supplier_name: line.supplier_name.clone(),
                    collaborator: line.collaborator.clone(),
                    product_name: line.product_name.clone(),
                    abv: line.abv.clone(),
                    slots: Vec::new(),
                });
                rows.len() - 1
            }
        };
        let row = &mut rows[index];

        if row.slots.contains(&slot) {
            continue;
        }
        if row.slots.len() >= MAX_PACKAGING_SLOTS {
            tracing::debug!(
                product = %line.product_name,
                supplier = %line.supplier_name,
                "worklist row already has {MAX_PACKAGING_SLOTS} packagings; dropping extra"
            );
            continue;
        }
        row.slots.push(slot);
    }

    rows
}
