//! Purchase-order assembly and two-step submission.
//!
//! Assembly is pure: it walks the reconciled table, keeps rows with a
//! resolved inventory ID for the target location, and fails before any
//! network traffic if nothing usable remains. Submission follows the
//! inventory API's two-step protocol — create the order header to obtain a
//! task ID, then attach the line array. The API offers no transactional
//! rollback, so a header whose lines fail to attach is surfaced to the
//! operator as a partial failure rather than retried or deleted.

use cellarman_cin7::{Cin7Client, Cin7Error, PurchaseHeader, PurchaseOrderLine, SupplierRecord};
use cellarman_core::{Conventions, LineItem, ReconcileStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderError {
    /// Every row was skipped: nothing to order. No header is created.
    #[error("no valid order lines: {skipped} rows lacked a resolved product ID for the location")]
    NoValidLines { skipped: usize },

    #[error("failed to create purchase order header: {message}")]
    HeaderCreate { message: String },

    /// The header exists but the lines were rejected — a partial-failure
    /// state the operator must resolve in the inventory system.
    #[error("purchase order {task_id} was created but attaching lines failed: {message}")]
    AttachLines { task_id: String, message: String },
}

/// An assembled, not-yet-submitted purchase order.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub supplier_id: String,
    pub supplier_name: String,
    pub location: String,
    pub tax_rule: String,
    pub lines: Vec<PurchaseOrderLine>,
    /// Rows skipped for lacking a resolved product ID at the location.
    pub skipped: usize,
}

/// The two inventory-API calls submission needs. Implemented by the Cin7
/// client; tests substitute a recording fixture.
#[allow(async_fn_in_trait)]
pub trait PurchaseApi {
    type Error: std::fmt::Display;

    async fn create_purchase(&self, header: &PurchaseHeader) -> Result<String, Self::Error>;

    async fn attach_order_lines(
        &self,
        task_id: &str,
        lines: Vec<PurchaseOrderLine>,
    ) -> Result<(), Self::Error>;
}

impl PurchaseApi for Cin7Client {
    type Error = Cin7Error;

    async fn create_purchase(&self, header: &PurchaseHeader) -> Result<String, Self::Error> {
        Cin7Client::create_purchase(self, header).await
    }

    async fn attach_order_lines(
        &self,
        task_id: &str,
        lines: Vec<PurchaseOrderLine>,
    ) -> Result<(), Self::Error> {
        Cin7Client::attach_order_lines(self, task_id, lines).await
    }
}

/// Builds the order payload for `location` from a reconciled table.
///
/// One order line per matched line item with a resolved product ID:
/// quantity, per-unit net price, computed total, and the configured tax
/// rule. Rows that are unmatched or unresolved for this location are
/// skipped and counted.
///
/// # Errors
///
/// Returns [`OrderError::NoValidLines`] when no usable row remains.
pub fn assemble_order(
    lines: &[LineItem],
    supplier: &SupplierRecord,
    location: &str,
    conventions: &Conventions,
) -> Result<OrderDraft, OrderError> {
    let mut order_lines = Vec::new();
    let mut skipped = 0usize;

    for line in lines {
        if line.status != ReconcileStatus::Matched {
            skipped += 1;
            continue;
        }
        let Some(product_id) = line
            .external_product_ids
            .get(location)
            .and_then(Clone::clone)
        else {
            skipped += 1;
            continue;
        };

        order_lines.push(PurchaseOrderLine {
            product_id,
            quantity: line.quantity,
            price: line.unit_price,
            total: line.quantity * line.unit_price,
            tax_rule: conventions.tax_rule.clone(),
        });
    }

    if order_lines.is_empty() {
        return Err(OrderError::NoValidLines { skipped });
    }

    if skipped > 0 {
        tracing::warn!(
            skipped,
            location,
            "order assembled with rows skipped for missing product IDs"
        );
    }

    Ok(OrderDraft {
        supplier_id: supplier.id.clone(),
        supplier_name: supplier.name.clone(),
        location: location.to_owned(),
        tax_rule: conventions.tax_rule.clone(),
        lines: order_lines,
        skipped,
    })
}

/// Submits an assembled order: header first, then the line array against the
/// returned task ID. Returns the task ID on success.
///
/// # Errors
///
/// - [`OrderError::HeaderCreate`] — the header call failed; nothing exists
///   upstream.
/// - [`OrderError::AttachLines`] — the header exists but the lines were
///   rejected; the error carries the task ID and the upstream message.
pub async fn submit_order<P: PurchaseApi>(
    api: &P,
    draft: OrderDraft,
    order_date: &str,
) -> Result<String, OrderError> {
    let header = PurchaseHeader {
        supplier_id: draft.supplier_id.clone(),
        location: draft.location.clone(),
        order_date: order_date.to_owned(),
        tax_rule: draft.tax_rule.clone(),
        status: "DRAFT".to_string(),
    };

    let task_id = api
        .create_purchase(&header)
        .await
        .map_err(|e| OrderError::HeaderCreate {
            message: e.to_string(),
        })?;

    tracing::info!(task_id = %task_id, supplier = %draft.supplier_name, "purchase order header created");

    api.attach_order_lines(&task_id, draft.lines)
        .await
        .map_err(|e| OrderError::AttachLines {
            task_id: task_id.clone(),
            message: e.to_string(),
        })?;

    Ok(task_id)
}
