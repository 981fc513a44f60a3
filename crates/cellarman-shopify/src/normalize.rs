//! Structural conversion from Shopify GraphQL nodes to the catalog records
//! the matcher consumes.

use cellarman_core::{CatalogProduct, CatalogVariant};

use crate::types::ShopifyProduct;

/// Flattens a GraphQL product node into a [`CatalogProduct`].
///
/// Metafields collapse to their values, variant edges collapse to nodes, and
/// empty-string SKUs become `None` so the SKU derivation stage never sees a
/// blank stock code pretending to be real.
#[must_use]
pub fn normalize_product(product: ShopifyProduct) -> CatalogProduct {
    let variants = product
        .variants
        .edges
        .into_iter()
        .map(|edge| {
            let node = edge.node;
            CatalogVariant {
                id: node.id,
                title: node.title,
                stock_code: node.sku.filter(|s| !s.is_empty()),
                available_quantity: node.inventory_quantity,
            }
        })
        .collect();

    CatalogProduct {
        id: product.id,
        title: product.title,
        status: product.status,
        format_meta: product.format_meta.map(|m| m.value),
        keg_type_meta: product.keg_type_meta.map(|m| m.value),
        image_url: product.featured_image.map(|i| i.url),
        variants,
    }
}
