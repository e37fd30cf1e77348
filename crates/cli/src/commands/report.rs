//! Report command - write the inventory summary.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;

use super::{DbArgs, open_existing_store};
use crate::Config;
use crate::report::{ReportData, TOP_ITEMS, render_report};

/// Arguments for the report command.
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Report file to write.
    #[arg(short = 'o', long, default_value = "inventory_report.txt")]
    pub output: PathBuf,

    #[command(flatten)]
    pub db: DbArgs,
}

/// Execute the report command.
pub fn execute(args: ReportArgs, config: &Config) -> Result<()> {
    let store = open_existing_store(&args.db.db, config)?;
    let data = ReportData {
        generated_at: Local::now().naive_local(),
        summary: store.summary()?,
        locations: store.location_totals()?,
        top_items: store.top_items(TOP_ITEMS)?,
    };

    fs::write(&args.output, render_report(&data))
        .with_context(|| format!("failed to write report {}", args.output.display()))?;
    println!("Report generated: {}", args.output.display());
    Ok(())
}
