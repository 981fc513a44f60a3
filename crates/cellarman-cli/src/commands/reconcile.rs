use std::path::PathBuf;

use anyhow::Context;
use cellarman_core::{AppConfig, Conventions};
use cellarman_recon::{lines_to_csv, reconcile, ReconcileOptions};

use super::{read_lines, write_text, HostCatalog, HostInventory};

#[derive(Debug, clap::Args)]
pub struct ReconcileArgs {
    /// Line-item file: raw extraction JSON or a previous run's annotated output
    #[arg(long)]
    pub lines: PathBuf,

    /// Where to write the annotated line items (JSON)
    #[arg(long)]
    pub out: PathBuf,

    /// Optional CSV rendering of the annotated table
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Optional file for the run's audit log (stdout when omitted)
    #[arg(long)]
    pub audit: Option<PathBuf>,

    /// Re-process lines that are already matched
    #[arg(long)]
    pub refresh_matched: bool,
}

pub async fn run(
    args: ReconcileArgs,
    config: &AppConfig,
    conventions: &Conventions,
) -> anyhow::Result<()> {
    let lines = read_lines(&args.lines)?;
    tracing::info!(count = lines.len(), "loaded line items");

    let catalog = HostCatalog::from_config(config)?;
    let inventory = HostInventory::from_config(config)?;

    let report = reconcile(
        lines,
        &catalog,
        &inventory,
        conventions,
        ReconcileOptions {
            refresh_matched: args.refresh_matched,
        },
    )
    .await;

    let annotated =
        serde_json::to_string_pretty(&report.lines).context("serializing annotated lines")?;
    write_text(&args.out, &annotated)?;

    if let Some(csv_path) = &args.csv {
        let csv = lines_to_csv(&report.lines, conventions)?;
        write_text(csv_path, &csv)?;
    }

    match &args.audit {
        Some(audit_path) => write_text(audit_path, &report.audit.join("\n"))?,
        None => {
            for entry in &report.audit {
                println!("{entry}");
            }
        }
    }

    let mut counts = std::collections::BTreeMap::new();
    for line in &report.lines {
        *counts.entry(line.status.label()).or_insert(0u32) += 1;
    }
    for (status, count) in counts {
        println!("{status}: {count}");
    }

    Ok(())
}
