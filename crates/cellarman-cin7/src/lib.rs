pub mod client;
pub mod directory;
pub mod error;
pub mod retry;
pub mod types;

pub use client::Cin7Client;
pub use directory::SupplierDirectory;
pub use error::Cin7Error;
pub use types::{PurchaseHeader, PurchaseOrderLine, SupplierRecord};
