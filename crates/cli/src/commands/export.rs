//! Export command - write a snapshot bundle.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use stockscan_core::time::parse_timestamp;
use stockscan_sync::export_bundle;

use super::{DbArgs, open_existing_store};
use crate::Config;

/// Arguments for the export command.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Bundle directory to write.
    pub path: PathBuf,

    /// Only include inventory records and scan events at or after this time
    /// (RFC 3339, `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD`).
    #[arg(long)]
    pub since: Option<String>,

    #[command(flatten)]
    pub db: DbArgs,
}

/// Execute the export command.
pub fn execute(args: ExportArgs, config: &Config) -> Result<()> {
    let since = args.since.as_deref().map(parse_timestamp).transpose()?;
    let store = open_existing_store(&args.db.db, config)?;
    let snapshot = export_bundle(&store, &args.path, since)?;

    println!("Data exported to {}", args.path.display());
    println!("- Locations: {}", snapshot.locations.len());
    println!("- Items: {}", snapshot.items.len());
    println!("- Inventory entries: {}", snapshot.inventory_records.len());
    println!("- Scan history: {}", snapshot.scan_events.len());
    Ok(())
}
