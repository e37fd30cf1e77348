//! Snapshot exchange between workstations.
//!
//! - [`bundle`]: the on-disk snapshot format (a directory of JSON files)
//! - [`export`]: point-in-time snapshots of a store
//! - [`import`]: merging or replacing a snapshot into a store
//! - [`master`]: combining many workstation snapshots into one ledger

pub mod bundle;
pub mod export;
pub mod import;
pub mod master;

pub use bundle::{Snapshot, SnapshotMetadata};
pub use export::{export_bundle, export_snapshot};
pub use import::{EntityStats, ImportStats, import_bundle, import_snapshot};
pub use master::{MasterOptions, MasterReport, build_master};
pub use stockscan_inventory::ImportMode;
