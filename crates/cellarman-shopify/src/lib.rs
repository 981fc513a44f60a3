pub mod client;
pub mod error;
pub mod normalize;
pub mod retry;
pub mod types;

pub use client::ShopifyClient;
pub use error::ShopifyError;
pub use normalize::normalize_product;
pub use types::{ShopifyProduct, ShopifyVariant};
