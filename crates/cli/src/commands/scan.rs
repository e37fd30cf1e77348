//! Scan and lookup commands.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stockscan_core::{ItemCode, time::format_timestamp};
use stockscan_inventory::parse_code_list;

use super::{DbArgs, open_existing_store};
use crate::Config;

/// Arguments for the scan command.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Location name or id.
    pub location: String,

    /// Codes to scan; each one is recorded separately.
    pub codes: Vec<String>,

    /// Quantity recorded per scan.
    #[arg(long, default_value_t = 1)]
    pub quantity: i64,

    /// Read additional codes from a file, one per line.
    #[arg(long)]
    pub from_file: Option<PathBuf>,

    #[command(flatten)]
    pub db: DbArgs,
}

/// Arguments for the stock command.
#[derive(Debug, Args)]
pub struct StockArgs {
    /// Location name or id.
    pub location: String,

    #[command(flatten)]
    pub db: DbArgs,
}

/// Arguments for the where command.
#[derive(Debug, Args)]
pub struct WhereArgs {
    /// Item code.
    pub code: String,

    #[command(flatten)]
    pub db: DbArgs,
}

/// Execute the scan command.
pub fn scan(args: ScanArgs, config: &Config) -> Result<()> {
    let mut codes = args
        .codes
        .iter()
        .map(ItemCode::parse)
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(path) = &args.from_file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read code list {}", path.display()))?;
        codes.extend(parse_code_list(&text)?);
    }
    if codes.is_empty() {
        anyhow::bail!("no codes to scan: pass codes or --from-file");
    }

    // Locations are created by add-location, so the ledger must already exist.
    let store = open_existing_store(&args.db.db, config)?;
    let location = store.resolve_location(&args.location)?;

    for code in &codes {
        let record = store.record_scan(code, &location.id, args.quantity)?;
        println!("{code} @ {}: {}", location.name, record.quantity);
    }
    println!("Recorded {} scan(s) at {}", codes.len(), location.name);
    Ok(())
}

/// Execute the stock command.
pub fn stock(args: StockArgs, config: &Config) -> Result<()> {
    let store = open_existing_store(&args.db.db, config)?;
    let location = store.resolve_location(&args.location)?;
    let lines = store.list_inventory_at(&location.id)?;

    println!("{} ({} item(s))", location.name, lines.len());
    for line in &lines {
        let description = if line.description.is_empty() {
            "No description"
        } else {
            line.description.as_str()
        };
        println!(
            "  {}: {} - Qty: {} (last scanned {})",
            line.item_code,
            description,
            line.quantity,
            format_timestamp(&line.last_scanned)
        );
    }
    Ok(())
}

/// Execute the where command.
pub fn locate(args: WhereArgs, config: &Config) -> Result<()> {
    let code = ItemCode::parse(&args.code)?;
    let store = open_existing_store(&args.db.db, config)?;
    let places = store.list_locations_for(&code)?;

    if places.is_empty() {
        println!("{code} is not stocked anywhere");
        return Ok(());
    }
    for place in &places {
        println!(
            "{}: {} - Qty: {} (last scanned {})",
            code,
            place.location.name,
            place.quantity,
            format_timestamp(&place.last_scanned)
        );
    }
    Ok(())
}
