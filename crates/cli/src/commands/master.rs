//! Master command - combine workstation bundles.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use stockscan_sync::{MasterOptions, build_master};

use super::import::print_stats;
use crate::{Config, render_error};

/// Arguments for the master command.
#[derive(Debug, Args)]
pub struct MasterArgs {
    /// Snapshot bundle directories, merged in the given order.
    #[arg(required = true)]
    pub sources: Vec<PathBuf>,

    /// Master database to build.
    #[arg(short = 'o', long, default_value = "master_inventory.db")]
    pub output: PathBuf,

    /// Merge on top of the existing master instead of rebuilding it.
    #[arg(long)]
    pub keep_existing: bool,
}

/// Execute the master command.
///
/// Sources that fail are reported and skipped; only a failure on the master
/// database itself is an error.
pub fn execute(args: MasterArgs, config: &Config) -> Result<()> {
    let options = MasterOptions {
        keep_existing: args.keep_existing,
        workstation: config.workstation.clone(),
    };
    let report = build_master(&args.sources, &args.output, &options)?;

    if let Some(backup) = &report.backup {
        println!("Backed up existing database to {}", backup.display());
    }
    for (source, stats) in &report.applied {
        println!("\nImported {}", source.display());
        print_stats(stats);
    }
    for (source, err) in &report.failed {
        println!("\nError importing {}:", source.display());
        println!("  {}", render_error(&anyhow::Error::from(err.clone())));
    }

    println!("\nMaster database created at {}", report.destination.display());
    Ok(())
}
