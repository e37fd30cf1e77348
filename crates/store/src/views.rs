//! Read projections returned by listing and report queries.

use stockscan_core::{ItemCode, Location, Timestamp};

/// One item held at a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStock {
    pub item_code: ItemCode,
    /// Empty when the item has no description (or no item row).
    pub description: String,
    pub quantity: i64,
    pub last_scanned: Timestamp,
}

/// One location holding a given item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationStock {
    pub location: Location,
    pub quantity: i64,
    pub last_scanned: Timestamp,
}

/// Whole-ledger totals.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct LedgerSummary {
    pub unique_items: i64,
    pub locations: i64,
    pub total_quantity: i64,
}

/// Totals for a single location, including locations with nothing in them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationTotal {
    pub name: String,
    pub unique_items: i64,
    pub total_quantity: i64,
}

/// An item ranked by its quantity summed over all locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopItem {
    pub item_code: ItemCode,
    pub description: String,
    pub total_quantity: i64,
}
