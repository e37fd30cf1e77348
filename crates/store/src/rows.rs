//! Row decoding.
//!
//! Columns are read leniently so that databases written by older tools (naive
//! timestamps, NULL descriptions or workstation ids) still load.

use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use stockscan_core::time::parse_timestamp;
use stockscan_core::{
    Attributes, InventoryRecord, Item, ItemCode, LedgerError, LedgerResult, Location, LocationId,
    ScanAction, ScanEvent, Timestamp, WorkstationId,
};

use crate::error::map_sqlx_error;

pub(crate) fn column<'r, T>(row: &'r SqliteRow, name: &str) -> LedgerResult<T>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name).map_err(|e| map_sqlx_error("decode_row", e))
}

/// Reads a `TOTAL()` aggregate. SQLite sums it as REAL, so it never
/// overflows; the cast saturates at the `i64` bounds.
pub(crate) fn quantity_total(row: &SqliteRow, name: &str) -> LedgerResult<i64> {
    let total: f64 = column(row, name)?;
    Ok(total as i64)
}

fn text(row: &SqliteRow, name: &str) -> LedgerResult<String> {
    Ok(column::<Option<String>>(row, name)?.unwrap_or_default())
}

fn timestamp(row: &SqliteRow, name: &str) -> LedgerResult<Timestamp> {
    let raw: String = column(row, name)?;
    parse_timestamp(&raw).map_err(|_| corrupt(name, &raw))
}

fn corrupt(column: &str, raw: &str) -> LedgerError {
    LedgerError::storage(format!("stored {column} is invalid: {raw:?}"))
}

fn location_id(row: &SqliteRow, name: &str) -> LedgerResult<LocationId> {
    let raw: String = column(row, name)?;
    LocationId::parse(&raw).map_err(|_| corrupt(name, &raw))
}

pub(crate) fn item_code(row: &SqliteRow, name: &str) -> LedgerResult<ItemCode> {
    let raw: String = column(row, name)?;
    ItemCode::parse(&raw).map_err(|_| corrupt(name, &raw))
}

pub(crate) fn location_from_row(row: &SqliteRow) -> LedgerResult<Location> {
    Ok(Location {
        id: location_id(row, "id")?,
        name: column(row, "name")?,
        description: text(row, "description")?,
        created_at: timestamp(row, "created_at")?,
    })
}

pub(crate) fn item_from_row(row: &SqliteRow) -> LedgerResult<Item> {
    let info = text(row, "additional_info")?;
    Ok(Item {
        code: item_code(row, "upc")?,
        description: text(row, "description")?,
        attributes: Attributes::from_json(&info).map_err(|_| corrupt("additional_info", &info))?,
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
    })
}

pub(crate) fn record_from_row(row: &SqliteRow) -> LedgerResult<InventoryRecord> {
    Ok(InventoryRecord {
        item_code: item_code(row, "item_upc")?,
        location_id: location_id(row, "location_id")?,
        quantity: column(row, "quantity")?,
        last_scanned: timestamp(row, "last_scanned")?,
    })
}

pub(crate) fn event_from_row(row: &SqliteRow) -> LedgerResult<ScanEvent> {
    let workstation = text(row, "workstation_id")?;
    Ok(ScanEvent {
        item_code: item_code(row, "item_upc")?,
        location_id: location_id(row, "location_id")?,
        action: ScanAction::from(column::<String>(row, "action")?),
        quantity_change: column::<Option<i64>>(row, "quantity_change")?.unwrap_or_default(),
        scanned_at: timestamp(row, "scanned_at")?,
        workstation: WorkstationId::parse(&workstation).unwrap_or_else(|_| WorkstationId::unknown()),
    })
}
