//! Import command - apply a snapshot bundle to the local ledger.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use stockscan_sync::{EntityStats, ImportMode, ImportStats, Snapshot, import_snapshot};

use super::{DbArgs, open_store};
use crate::Config;

/// Arguments for the import command.
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Bundle directory to read.
    pub path: PathBuf,

    /// Merge into the ledger (add quantities, keep newer items) instead of
    /// replacing rows.
    #[arg(long)]
    pub merge: bool,

    #[command(flatten)]
    pub db: DbArgs,
}

/// Execute the import command.
pub fn execute(args: ImportArgs, config: &Config) -> Result<()> {
    let mode = if args.merge { ImportMode::Merge } else { ImportMode::Replace };

    let snapshot = Snapshot::read_bundle(&args.path)?;
    println!(
        "Importing data from {} exported on {}",
        snapshot.metadata.workstation,
        stockscan_core::time::format_timestamp(&snapshot.metadata.export_date)
    );

    let store = open_store(&args.db.db, config)?;
    let stats = import_snapshot(&store, &snapshot, mode)?;

    println!("Import completed:");
    print_stats(&stats);
    Ok(())
}

pub(crate) fn print_stats(stats: &ImportStats) {
    print_entity("Locations", &stats.locations);
    print_entity("Items", &stats.items);
    print_entity("Inventory entries", &stats.inventory_records);
    println!("- Scan history: {} appended", stats.events_appended);
}

fn print_entity(label: &str, stats: &EntityStats) {
    println!(
        "- {label}: {} ({} new, {} updated, {} kept, {} skipped)",
        stats.total(),
        stats.inserted,
        stats.overwritten,
        stats.kept,
        stats.skipped
    );
}
