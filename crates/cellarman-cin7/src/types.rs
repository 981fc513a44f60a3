//! Cin7 Core (DEAR) external API types.
//!
//! The API uses PascalCase field names and wraps list endpoints in a
//! `{"Total": N, "Page": N, "<Plural>": [...]}` envelope. Monetary values are
//! sent as decimal strings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One supplier record from `/supplier`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SupplierRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Currency", default)]
    pub currency: Option<String>,
}

/// Envelope for `/supplier` list responses.
#[derive(Debug, Deserialize)]
pub struct SupplierListResponse {
    #[serde(rename = "Suppliers", default)]
    pub suppliers: Vec<SupplierRecord>,
}

/// One product record from `/product`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "SKU", default)]
    pub sku: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
}

/// Envelope for `/product` list responses.
#[derive(Debug, Deserialize)]
pub struct ProductListResponse {
    #[serde(rename = "Products", default)]
    pub products: Vec<ProductRecord>,
}

/// Purchase-order header for `POST /purchase`. Creating the header yields
/// the task ID that order lines attach to.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseHeader {
    #[serde(rename = "SupplierID")]
    pub supplier_id: String,
    #[serde(rename = "Location")]
    pub location: String,
    /// `YYYY-MM-DD`.
    #[serde(rename = "OrderDate")]
    pub order_date: String,
    #[serde(rename = "TaxRule")]
    pub tax_rule: String,
    #[serde(rename = "Status")]
    pub status: String,
}

/// Response from `POST /purchase`.
#[derive(Debug, Deserialize)]
pub struct PurchaseCreated {
    #[serde(rename = "ID")]
    pub id: String,
}

/// One order line for `POST /purchase/order`.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseOrderLine {
    #[serde(rename = "ProductID")]
    pub product_id: String,
    #[serde(rename = "Quantity")]
    pub quantity: Decimal,
    #[serde(rename = "Price")]
    pub price: Decimal,
    #[serde(rename = "Total")]
    pub total: Decimal,
    #[serde(rename = "TaxRule")]
    pub tax_rule: String,
}

/// Payload for `POST /purchase/order`: the line array attached to a
/// previously created purchase task.
#[derive(Debug, Serialize)]
pub struct PurchaseOrderPayload {
    #[serde(rename = "TaskID")]
    pub task_id: String,
    #[serde(rename = "Lines")]
    pub lines: Vec<PurchaseOrderLine>,
}
