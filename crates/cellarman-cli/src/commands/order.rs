use std::path::PathBuf;

use anyhow::{bail, Context};
use cellarman_cin7::{Cin7Client, SupplierDirectory};
use cellarman_core::{AppConfig, Conventions};
use cellarman_recon::{assemble_order, submit_order};

use super::read_lines;

#[derive(Debug, clap::Args)]
pub struct OrderArgs {
    /// Annotated line-item file from a reconcile run
    #[arg(long)]
    pub lines: PathBuf,

    /// Target warehouse location (must match a configured location name)
    #[arg(long)]
    pub location: String,

    /// Invoice header JSON; its payable-to name selects the supplier
    #[arg(long)]
    pub header: Option<PathBuf>,

    /// Supplier name override; defaults to the header's payable-to, then to
    /// the supplier on the line items
    #[arg(long)]
    pub supplier: Option<String>,

    /// Order date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub date: Option<String>,
}

pub async fn run(
    args: OrderArgs,
    config: &AppConfig,
    conventions: &Conventions,
) -> anyhow::Result<()> {
    let Some(credentials) = &config.cin7 else {
        bail!("Cin7 credentials are required to raise purchase orders");
    };
    if !conventions
        .locations
        .iter()
        .any(|l| l.name == args.location)
    {
        bail!("unknown location '{}'", args.location);
    }

    let lines = read_lines(&args.lines)?;

    let payable_to = match &args.header {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading invoice header from {}", path.display()))?;
            let header: cellarman_core::InvoiceHeader =
                serde_json::from_str(&content).context("parsing invoice header")?;
            header.payable_to
        }
        None => None,
    };

    let supplier_name = match args.supplier.or(payable_to) {
        Some(name) => name,
        None => {
            let mut names: Vec<&str> = lines
                .iter()
                .map(|l| l.supplier_name.as_str())
                .filter(|n| !n.is_empty())
                .collect();
            names.sort_unstable();
            names.dedup();
            match names.as_slice() {
                [] => bail!("line items carry no supplier name; pass --supplier"),
                [single] => (*single).to_string(),
                many => bail!(
                    "line items span {} suppliers ({}); pass --supplier",
                    many.len(),
                    many.join(", ")
                ),
            }
        }
    };

    let client = Cin7Client::new(
        credentials,
        &config.cin7_base_url,
        config.http_timeout_secs,
        config.max_retries,
        config.retry_backoff_base_secs,
    )?;
    let directory = SupplierDirectory::new(client, config.supplier_page_size);

    let supplier = directory
        .resolve(&supplier_name, conventions)
        .await
        .context("supplier lookup failed")?;
    let Some(supplier) = supplier else {
        bail!("supplier '{supplier_name}' not found in the inventory system");
    };
    println!(
        "Supplier: {} ({}{})",
        supplier.name,
        supplier.id,
        supplier
            .currency
            .as_deref()
            .map(|c| format!(", {c}"))
            .unwrap_or_default()
    );

    let draft = assemble_order(&lines, &supplier, &args.location, conventions)?;
    if draft.skipped > 0 {
        println!(
            "Skipped {} line(s) without a resolved product ID for {}.",
            draft.skipped, args.location
        );
    }
    println!("Submitting {} order line(s)...", draft.lines.len());

    let order_date = args
        .date
        .unwrap_or_else(|| chrono::Utc::now().date_naive().to_string());

    let task_id = submit_order(directory.client(), draft, &order_date).await?;
    println!("Purchase order created: {task_id}");
    Ok(())
}
