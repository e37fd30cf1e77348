//! Command implementations.

pub mod export;
pub mod import;
pub mod location;
pub mod master;
pub mod report;
pub mod scan;

use std::path::{Path, PathBuf};

use clap::Args;

use stockscan_core::LedgerResult;
use stockscan_store::{LedgerStore, StoreConfig};

use crate::Config;

/// Database selection shared by the ledger commands.
#[derive(Debug, Args)]
pub struct DbArgs {
    /// Ledger database file.
    #[arg(long, default_value = "inventory.db")]
    pub db: PathBuf,
}

/// Open the ledger, creating it if needed.
fn open_store(db: &Path, config: &Config) -> LedgerResult<LedgerStore> {
    LedgerStore::open(StoreConfig::file(db, config.workstation.clone()))
}

/// Open a ledger that must already exist.
fn open_existing_store(db: &Path, config: &Config) -> LedgerResult<LedgerStore> {
    LedgerStore::open_existing(StoreConfig::file(db, config.workstation.clone()))
}
