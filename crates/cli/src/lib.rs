//! # stockscan-cli
//!
//! Command-line interface for the scan ledger.
//!
//! ## Commands
//!
//! - `stockscan export` - Write a snapshot bundle of the local ledger
//! - `stockscan import` - Merge or replace a snapshot bundle into the ledger
//! - `stockscan master` - Combine workstation bundles into a master ledger
//! - `stockscan report` - Write a plain-text inventory summary
//! - `stockscan add-location`, `locations` - Manage locations
//! - `stockscan scan`, `stock`, `where` - Record scans and look things up
//!
//! ## Configuration
//!
//! - `STOCKSCAN_WORKSTATION` - Workstation identity (falls back to
//!   `COMPUTERNAME`, then `HOSTNAME`, then `unknown`)
//! - `RUST_LOG` - Log filter (default `info`)

pub mod commands;
pub mod report;

use clap::{Parser, Subcommand};

use stockscan_core::{LedgerError, WorkstationId};
use stockscan_observability::LogFormat;

/// Inventory scan ledger.
#[derive(Debug, Parser)]
#[command(name = "stockscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Workstation identity stamped on scans and exports.
    #[arg(long, global = true, env = "STOCKSCAN_WORKSTATION")]
    pub workstation: Option<String>,

    /// Log output format (text or json).
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Effective configuration, reading fallbacks from the process environment.
    pub fn config(&self) -> Config {
        Config {
            workstation: resolve_workstation(self.workstation.as_deref(), |key| {
                std::env::var(key).ok()
            }),
        }
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Export the ledger to a snapshot bundle directory.
    Export(commands::export::ExportArgs),
    /// Import a snapshot bundle (replace by default, or --merge).
    Import(commands::import::ImportArgs),
    /// Build a master ledger from several snapshot bundles.
    Master(commands::master::MasterArgs),
    /// Write an inventory summary report.
    Report(commands::report::ReportArgs),
    /// Create a location.
    AddLocation(commands::location::AddLocationArgs),
    /// List locations.
    Locations(commands::location::LocationsArgs),
    /// Record scans of one or more codes at a location.
    Scan(commands::scan::ScanArgs),
    /// Show what is stored at a location.
    Stock(commands::scan::StockArgs),
    /// Show where an item is stored.
    Where(commands::scan::WhereArgs),
}

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub workstation: WorkstationId,
}

/// Pick the workstation identity: explicit value, then `COMPUTERNAME`, then
/// `HOSTNAME`, then `unknown`. Blank values are ignored.
pub fn resolve_workstation(
    explicit: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> WorkstationId {
    explicit
        .map(str::to_string)
        .into_iter()
        .chain(["COMPUTERNAME", "HOSTNAME"].into_iter().filter_map(|key| env(key)))
        .find_map(|raw| WorkstationId::parse(raw).ok())
        .unwrap_or_else(WorkstationId::unknown)
}

/// One-line rendering of a failed command.
pub fn render_error(err: &anyhow::Error) -> String {
    match err.chain().find_map(|cause| cause.downcast_ref::<LedgerError>()) {
        Some(ledger_err) => format!("error[{}]: {err:#}", ledger_err.kind()),
        None => format!("error: {err:#}"),
    }
}
