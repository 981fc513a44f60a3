//! CSV rendering of the produced artifacts: the annotated line-item table,
//! the missing-products worklist, and the invoice header.
//!
//! Column order is presentation; the column *set* follows the data model —
//! one SKU and one product-ID column per configured location on the line
//! table, three numbered packaging slots on the worklist.

use cellarman_core::{Conventions, InvoiceHeader, LineItem};
use thiserror::Error;

use crate::matrix::{MatrixRow, MAX_PACKAGING_SLOTS};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV render error: {0}")]
    Render(String),
}

/// Renders the annotated line-item table.
///
/// # Errors
///
/// Returns [`ExportError`] if CSV serialization fails.
pub fn lines_to_csv(lines: &[LineItem], conventions: &Conventions) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec![
        "Supplier".to_string(),
        "Collaborator".to_string(),
        "Product".to_string(),
        "ABV".to_string(),
        "Format".to_string(),
        "Pack_Size".to_string(),
        "Volume".to_string(),
        "Quantity".to_string(),
        "Unit_Price".to_string(),
        "Status".to_string(),
        "Matched_Product".to_string(),
        "Matched_Variant".to_string(),
    ];
    for location in &conventions.locations {
        header.push(format!("{} SKU", location.name));
        header.push(format!("{} Product ID", location.name));
    }
    writer.write_record(&header)?;

    for line in lines {
        let mut record = vec![
            line.supplier_name.clone(),
            line.collaborator.clone().unwrap_or_default(),
            line.product_name.clone(),
            line.abv.clone().unwrap_or_default(),
            line.format.clone(),
            line.pack_size.clone().unwrap_or_default(),
            line.volume.clone(),
            line.quantity.to_string(),
            line.unit_price.to_string(),
            line.status.label().to_string(),
            line.matched_product_name.clone().unwrap_or_default(),
            line.matched_variant_name.clone().unwrap_or_default(),
        ];
        for location in &conventions.locations {
            record.push(
                line.location_stock_codes
                    .get(&location.name)
                    .cloned()
                    .unwrap_or_default(),
            );
            record.push(
                line.external_product_ids
                    .get(&location.name)
                    .and_then(Clone::clone)
                    .unwrap_or_default(),
            );
        }
        writer.write_record(&record)?;
    }

    finish(writer)
}

/// Renders the missing-products worklist with numbered packaging slots and
/// their creation-progress flags.
///
/// # Errors
///
/// Returns [`ExportError`] if CSV serialization fails.
pub fn matrix_to_csv(rows: &[MatrixRow]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec![
        "Supplier".to_string(),
        "Collaborator".to_string(),
        "Product".to_string(),
        "ABV".to_string(),
    ];
    for slot in 1..=MAX_PACKAGING_SLOTS {
        header.push(format!("Format{slot}"));
        header.push(format!("Pack{slot}"));
        header.push(format!("Volume{slot}"));
        header.push(format!("Price{slot}"));
        header.push(format!("Create{slot}"));
    }
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![
            row.supplier_name.clone(),
            row.collaborator.clone().unwrap_or_default(),
            row.product_name.clone(),
            row.abv.clone().unwrap_or_default(),
        ];
        for index in 0..MAX_PACKAGING_SLOTS {
            match row.slots.get(index) {
                Some(slot) => {
                    record.push(slot.format.clone());
                    record.push(slot.pack_size.clone());
                    record.push(slot.volume.clone());
                    record.push(slot.unit_price.to_string());
                    record.push(slot.created.to_string());
                }
                None => record.extend(std::iter::repeat_n(String::new(), 5)),
            }
        }
        writer.write_record(&record)?;
    }

    finish(writer)
}

/// Renders the invoice header record.
///
/// # Errors
///
/// Returns [`ExportError`] if CSV serialization fails.
pub fn header_to_csv(header: &InvoiceHeader) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "Payable_To",
        "Invoice_Number",
        "Invoice_Date",
        "Due_Date",
        "Net_Total",
        "VAT_Total",
        "Gross_Total",
    ])?;
    writer.write_record([
        header.payable_to.clone().unwrap_or_default(),
        header.invoice_number.clone().unwrap_or_default(),
        header.invoice_date.clone().unwrap_or_default(),
        header.due_date.clone().unwrap_or_default(),
        header.net_total.map(|d| d.to_string()).unwrap_or_default(),
        header.vat_total.map(|d| d.to_string()).unwrap_or_default(),
        header
            .gross_total
            .map(|d| d.to_string())
            .unwrap_or_default(),
    ])?;
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Render(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Render(e.to_string()))
}
