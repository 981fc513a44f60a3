pub mod app_config;
pub mod config;
pub mod conventions;
pub mod normalize;
pub mod similarity;
pub mod types;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use conventions::{CaskAlias, Conventions, LocationCode};
pub use types::{
    CatalogProduct, CatalogVariant, InvoiceHeader, LineItem, RawLineItem, ReconcileStatus,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read conventions file {path}: {source}")]
    ConventionsIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse conventions file: {0}")]
    ConventionsParse(#[from] serde_yaml::Error),

    #[error("config validation failed: {0}")]
    Validation(String),
}
