pub mod catalog;
pub mod export;
pub mod matcher;
pub mod matrix;
pub mod order;
pub mod orchestrator;
pub mod sku;

pub use catalog::{CatalogSource, VendorCache};
pub use export::{header_to_csv, lines_to_csv, matrix_to_csv, ExportError};
pub use matcher::{match_line, MatchOutcome, MatchedVariant};
pub use matrix::{build_matrix, MatrixRow, PackagingSlot, MAX_PACKAGING_SLOTS};
pub use order::{assemble_order, submit_order, OrderDraft, OrderError, PurchaseApi};
pub use orchestrator::{reconcile, NullInventory, ReconcileOptions, ReconcileReport, SkuLookup};
pub use sku::derive_location_skus;
