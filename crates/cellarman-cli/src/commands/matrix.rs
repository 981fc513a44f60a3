use std::path::PathBuf;

use cellarman_recon::{build_matrix, matrix_to_csv};

use super::{read_lines, write_text};

#[derive(Debug, clap::Args)]
pub struct MatrixArgs {
    /// Annotated line-item file from a reconcile run
    #[arg(long)]
    pub lines: PathBuf,

    /// Where to write the worklist CSV
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &MatrixArgs) -> anyhow::Result<()> {
    let lines = read_lines(&args.lines)?;
    let rows = build_matrix(&lines);

    if rows.is_empty() {
        println!("All products matched — nothing to create.");
    } else {
        println!("{} products awaiting catalog creation.", rows.len());
    }

    let csv = matrix_to_csv(&rows)?;
    write_text(&args.out, &csv)
}
