//! Inventory rules.
//!
//! This crate contains the reconciliation and scan rules, implemented purely as
//! deterministic domain logic (no IO, no storage). The store executes the
//! decisions made here inside its transactions.

pub mod reconcile;
pub mod scan;

pub use reconcile::{
    ImportMode, Resolution, reconcile_item, reconcile_location, reconcile_record,
};
pub use scan::{RecordScan, ScanEffects, parse_code_list, plan_scan};
