//! Store configuration.

use std::path::{Path, PathBuf};

use stockscan_core::WorkstationId;

/// Where the ledger database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    /// Private in-memory database, gone when the store is dropped.
    InMemory,
}

/// Everything needed to open a [`crate::LedgerStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub location: StoreLocation,
    /// Stamped on every scan event and exported snapshot.
    pub workstation: WorkstationId,
}

impl StoreConfig {
    pub fn file(path: impl Into<PathBuf>, workstation: WorkstationId) -> Self {
        Self {
            location: StoreLocation::File(path.into()),
            workstation,
        }
    }

    pub fn in_memory(workstation: WorkstationId) -> Self {
        Self {
            location: StoreLocation::InMemory,
            workstation,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            StoreLocation::File(path) => Some(path),
            StoreLocation::InMemory => None,
        }
    }
}
