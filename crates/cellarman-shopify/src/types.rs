//! Shopify Admin GraphQL response types for the vendor products query.
//!
//! The Admin API wraps everything in a `{"data": ..., "errors": [...]}`
//! envelope; `errors` may appear alongside partial `data`, so both fields
//! are optional and the client checks `errors` first. Connections follow the
//! Relay shape (`edges` → `node`, `pageInfo` with `hasNextPage`/`endCursor`).

use serde::Deserialize;

/// Top-level GraphQL envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlEnvelope {
    #[serde(default)]
    pub data: Option<ProductsData>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ProductsData {
    pub products: ProductConnection,
}

#[derive(Debug, Deserialize)]
pub struct ProductConnection {
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
    pub edges: Vec<ProductEdge>,
}

#[derive(Debug, Deserialize)]
pub struct PageInfo {
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
    /// Cursor of the last edge on this page. `null` on an empty page.
    #[serde(rename = "endCursor", default)]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProductEdge {
    pub node: ShopifyProduct,
}

/// A single product node from the vendor query.
#[derive(Debug, Deserialize)]
pub struct ShopifyProduct {
    /// GraphQL global ID, e.g. `"gid://shopify/Product/123"`.
    pub id: String,
    pub title: String,
    /// `ACTIVE`, `DRAFT`, or `ARCHIVED`. All three are searched and all
    /// three are valid match targets.
    #[serde(default)]
    pub status: Option<String>,
    /// `custom.Format` metafield (aliased in the query).
    #[serde(rename = "formatMeta", default)]
    pub format_meta: Option<MetafieldValue>,
    /// `custom.KegType` metafield (aliased in the query).
    #[serde(rename = "kegTypeMeta", default)]
    pub keg_type_meta: Option<MetafieldValue>,
    #[serde(rename = "featuredImage", default)]
    pub featured_image: Option<FeaturedImage>,
    pub variants: VariantConnection,
}

#[derive(Debug, Deserialize)]
pub struct MetafieldValue {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct FeaturedImage {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct VariantConnection {
    pub edges: Vec<VariantEdge>,
}

#[derive(Debug, Deserialize)]
pub struct VariantEdge {
    pub node: ShopifyVariant,
}

/// A single variant node.
#[derive(Debug, Deserialize)]
pub struct ShopifyVariant {
    pub id: String,
    /// Pack × volume text, e.g. `"24 x 33cl"`, or `"Default Title"`.
    pub title: String,
    /// May be an empty string on some products; normalized to `None`.
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(rename = "inventoryQuantity", default)]
    pub inventory_quantity: Option<i64>,
}
