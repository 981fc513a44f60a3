use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "cellarman")]
#[command(about = "Reconcile brewery invoice lines against Shopify and Cin7")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Reconcile extracted invoice lines against the catalog and inventory system
    Reconcile(commands::reconcile::ReconcileArgs),
    /// Build the missing-products worklist from reconciled lines
    Matrix(commands::matrix::MatrixArgs),
    /// Raise a purchase order from fully matched lines
    Order(commands::order::OrderArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = cellarman_core::load_app_config_from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let conventions = commands::load_conventions(&config)?;

    match Cli::parse().command {
        Commands::Reconcile(args) => commands::reconcile::run(args, &config, &conventions).await,
        Commands::Matrix(args) => commands::matrix::run(&args),
        Commands::Order(args) => commands::order::run(args, &config, &conventions).await,
    }
}
