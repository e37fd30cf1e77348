//! Ledger building blocks.
//!
//! This crate contains **pure domain** types (no storage, no filesystem):
//! identifiers, timestamps, the four ledger entities and the error taxonomy
//! shared by the store, the snapshot tooling and the CLI.

pub mod error;
pub mod id;
pub mod model;
pub mod time;

pub use error::{LedgerError, LedgerResult};
pub use id::{ItemCode, LocationId, WorkstationId};
pub use model::{Attributes, InventoryRecord, Item, Location, ScanAction, ScanEvent};
pub use time::Timestamp;
