//! Transaction handle: the read and write primitives of the ledger.
//!
//! A [`LedgerTx`] is only obtained through [`crate::LedgerStore::transaction`],
//! which commits when the closure returns `Ok` and rolls back otherwise.

use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteQueryResult, SqliteRow};
use sqlx::{Sqlite, Transaction};
use tokio::runtime::Runtime;

use stockscan_core::time::format_timestamp;
use stockscan_core::{
    InventoryRecord, Item, ItemCode, LedgerError, LedgerResult, Location, LocationId, ScanEvent,
    Timestamp,
};

use crate::error::{is_unique_violation, map_sqlx_error};
use crate::rows::{
    column, event_from_row, item_code, item_from_row, location_from_row, quantity_total,
    record_from_row,
};
use crate::views::{ItemStock, LedgerSummary, LocationStock, LocationTotal, TopItem};

const LOCATION_COLUMNS: &str = "id, name, description, created_at";
const ITEM_COLUMNS: &str = "upc, description, additional_info, created_at, updated_at";
const RECORD_COLUMNS: &str = "item_upc, location_id, quantity, last_scanned";
const EVENT_COLUMNS: &str =
    "item_upc, location_id, action, quantity_change, scanned_at, workstation_id";

/// An open ledger transaction.
pub struct LedgerTx<'a> {
    pub(crate) rt: &'a Runtime,
    pub(crate) tx: Transaction<'static, Sqlite>,
}

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

impl LedgerTx<'_> {
    fn fetch_optional(&mut self, operation: &str, query: SqliteQuery<'_>) -> LedgerResult<Option<SqliteRow>> {
        let rt = self.rt;
        let conn = &mut *self.tx;
        rt.block_on(query.fetch_optional(conn))
            .map_err(|e| map_sqlx_error(operation, e))
    }

    fn fetch_all(&mut self, operation: &str, query: SqliteQuery<'_>) -> LedgerResult<Vec<SqliteRow>> {
        let rt = self.rt;
        let conn = &mut *self.tx;
        rt.block_on(query.fetch_all(conn))
            .map_err(|e| map_sqlx_error(operation, e))
    }

    fn execute(&mut self, query: SqliteQuery<'_>) -> Result<SqliteQueryResult, sqlx::Error> {
        let rt = self.rt;
        let conn = &mut *self.tx;
        rt.block_on(query.execute(conn))
    }

    // --- point lookups ---

    pub fn location(&mut self, id: &LocationId) -> LedgerResult<Option<Location>> {
        let sql = format!("SELECT {LOCATION_COLUMNS} FROM locations WHERE id = ?1");
        let row = self.fetch_optional("load_location", sqlx::query(&sql).bind(id.as_str()))?;
        row.as_ref().map(location_from_row).transpose()
    }

    pub fn location_by_name(&mut self, name: &str) -> LedgerResult<Option<Location>> {
        let sql = format!("SELECT {LOCATION_COLUMNS} FROM locations WHERE name = ?1");
        let row = self.fetch_optional("load_location_by_name", sqlx::query(&sql).bind(name))?;
        row.as_ref().map(location_from_row).transpose()
    }

    pub fn item(&mut self, code: &ItemCode) -> LedgerResult<Option<Item>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE upc = ?1");
        let row = self.fetch_optional("load_item", sqlx::query(&sql).bind(code.as_str()))?;
        row.as_ref().map(item_from_row).transpose()
    }

    pub fn record(
        &mut self,
        code: &ItemCode,
        location_id: &LocationId,
    ) -> LedgerResult<Option<InventoryRecord>> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM inventory WHERE item_upc = ?1 AND location_id = ?2"
        );
        let query = sqlx::query(&sql)
            .bind(code.as_str())
            .bind(location_id.as_str());
        let row = self.fetch_optional("load_record", query)?;
        row.as_ref().map(record_from_row).transpose()
    }

    // --- writes ---

    /// Insert a new location; a taken name is [`LedgerError::DuplicateName`].
    pub fn insert_location(&mut self, location: &Location) -> LedgerResult<()> {
        let query = sqlx::query(
            "INSERT INTO locations (id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(location.id.as_str())
        .bind(location.name.as_str())
        .bind(location.description.as_str())
        .bind(format_timestamp(&location.created_at));

        match self.execute(query) {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(LedgerError::duplicate_name(location.name.clone()))
            }
            Err(err) => Err(map_sqlx_error("insert_location", err)),
        }
    }

    /// Insert or overwrite a location by id. Any other location holding the
    /// same name is removed.
    pub fn replace_location(&mut self, location: &Location) -> LedgerResult<()> {
        let query = sqlx::query(
            "INSERT OR REPLACE INTO locations (id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(location.id.as_str())
        .bind(location.name.as_str())
        .bind(location.description.as_str())
        .bind(format_timestamp(&location.created_at));

        self.execute(query)
            .map(|_| ())
            .map_err(|e| map_sqlx_error("replace_location", e))
    }

    pub fn upsert_item(&mut self, item: &Item) -> LedgerResult<()> {
        let query = sqlx::query(
            r#"
            INSERT INTO items (upc, description, additional_info, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (upc) DO UPDATE SET
                description     = excluded.description,
                additional_info = excluded.additional_info,
                created_at      = excluded.created_at,
                updated_at      = excluded.updated_at
            "#,
        )
        .bind(item.code.as_str())
        .bind(item.description.as_str())
        .bind(item.attributes.to_json())
        .bind(format_timestamp(&item.created_at))
        .bind(format_timestamp(&item.updated_at));

        self.execute(query)
            .map(|_| ())
            .map_err(|e| map_sqlx_error("upsert_item", e))
    }

    pub fn upsert_record(&mut self, record: &InventoryRecord) -> LedgerResult<()> {
        let query = sqlx::query(
            r#"
            INSERT INTO inventory (item_upc, location_id, quantity, last_scanned)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (item_upc, location_id) DO UPDATE SET
                quantity     = excluded.quantity,
                last_scanned = excluded.last_scanned
            "#,
        )
        .bind(record.item_code.as_str())
        .bind(record.location_id.as_str())
        .bind(record.quantity)
        .bind(format_timestamp(&record.last_scanned));

        self.execute(query)
            .map(|_| ())
            .map_err(|e| map_sqlx_error("upsert_record", e))
    }

    /// Append a scan event and return its sequence number.
    pub fn append_event(&mut self, event: &ScanEvent) -> LedgerResult<i64> {
        let query = sqlx::query(
            r#"
            INSERT INTO scan_history
                (item_upc, location_id, action, quantity_change, scanned_at, workstation_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(event.item_code.as_str())
        .bind(event.location_id.as_str())
        .bind(event.action.as_str())
        .bind(event.quantity_change)
        .bind(format_timestamp(&event.scanned_at))
        .bind(event.workstation.as_str());

        self.execute(query)
            .map(|result| result.last_insert_rowid())
            .map_err(|e| map_sqlx_error("append_event", e))
    }

    // --- full reads ---

    /// All locations ordered by name.
    pub fn all_locations(&mut self) -> LedgerResult<Vec<Location>> {
        let sql = format!("SELECT {LOCATION_COLUMNS} FROM locations ORDER BY name");
        let rows = self.fetch_all("list_locations", sqlx::query(&sql))?;
        rows.iter().map(location_from_row).collect()
    }

    /// All items ordered by code.
    pub fn all_items(&mut self) -> LedgerResult<Vec<Item>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items ORDER BY upc");
        let rows = self.fetch_all("list_items", sqlx::query(&sql))?;
        rows.iter().map(item_from_row).collect()
    }

    /// Inventory records, optionally only those scanned at or after `since`.
    pub fn inventory_records(&mut self, since: Option<&Timestamp>) -> LedgerResult<Vec<InventoryRecord>> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM inventory WHERE (?1 IS NULL OR last_scanned >= ?1) ORDER BY id"
        );
        let query = sqlx::query(&sql).bind(since.map(format_timestamp));
        let rows = self.fetch_all("list_inventory_records", query)?;
        rows.iter().map(record_from_row).collect()
    }

    /// Scan events in sequence order, optionally only those at or after `since`.
    pub fn scan_events(&mut self, since: Option<&Timestamp>) -> LedgerResult<Vec<ScanEvent>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM scan_history WHERE (?1 IS NULL OR scanned_at >= ?1) ORDER BY id"
        );
        let query = sqlx::query(&sql).bind(since.map(format_timestamp));
        let rows = self.fetch_all("list_scan_events", query)?;
        rows.iter().map(event_from_row).collect()
    }

    // --- listings ---

    /// Items held at a location, most recently scanned first.
    pub fn inventory_at(&mut self, location_id: &LocationId) -> LedgerResult<Vec<ItemStock>> {
        let query = sqlx::query(
            r#"
            SELECT inv.item_upc, inv.location_id, inv.quantity, inv.last_scanned,
                   COALESCE(i.description, '') AS description
            FROM inventory inv
            LEFT JOIN items i ON i.upc = inv.item_upc
            WHERE inv.location_id = ?1
            ORDER BY inv.last_scanned DESC, inv.item_upc
            "#,
        )
        .bind(location_id.as_str());

        let rows = self.fetch_all("list_inventory_at", query)?;
        rows.iter()
            .map(|row| {
                let record = record_from_row(row)?;
                Ok(ItemStock {
                    item_code: record.item_code,
                    description: column(row, "description")?,
                    quantity: record.quantity,
                    last_scanned: record.last_scanned,
                })
            })
            .collect()
    }

    /// Locations holding an item, most recently scanned first.
    pub fn locations_for(&mut self, code: &ItemCode) -> LedgerResult<Vec<LocationStock>> {
        let query = sqlx::query(
            r#"
            SELECT l.id, l.name, l.description, l.created_at,
                   inv.item_upc, inv.location_id, inv.quantity, inv.last_scanned
            FROM inventory inv
            JOIN locations l ON l.id = inv.location_id
            WHERE inv.item_upc = ?1
            ORDER BY inv.last_scanned DESC, l.name
            "#,
        )
        .bind(code.as_str());

        let rows = self.fetch_all("list_locations_for", query)?;
        rows.iter()
            .map(|row| {
                let record = record_from_row(row)?;
                Ok(LocationStock {
                    location: location_from_row(row)?,
                    quantity: record.quantity,
                    last_scanned: record.last_scanned,
                })
            })
            .collect()
    }

    // --- report projections ---

    pub fn summary(&mut self) -> LedgerResult<LedgerSummary> {
        let query = sqlx::query(
            r#"
            SELECT (SELECT COUNT(*) FROM items)                      AS unique_items,
                   (SELECT COUNT(*) FROM locations)                  AS locations,
                   (SELECT TOTAL(quantity) FROM inventory)            AS total_quantity
            "#,
        );
        let row = self
            .fetch_optional("ledger_summary", query)?
            .ok_or_else(|| LedgerError::storage("ledger summary returned no row"))?;

        Ok(LedgerSummary {
            unique_items: column(&row, "unique_items")?,
            locations: column(&row, "locations")?,
            total_quantity: quantity_total(&row, "total_quantity")?,
        })
    }

    /// Per-location totals by name; empty locations report zeros.
    pub fn location_totals(&mut self) -> LedgerResult<Vec<LocationTotal>> {
        let query = sqlx::query(
            r#"
            SELECT l.name AS name,
                   COUNT(DISTINCT inv.item_upc)     AS unique_items,
                   TOTAL(inv.quantity)              AS total_quantity
            FROM locations l
            LEFT JOIN inventory inv ON l.id = inv.location_id
            GROUP BY l.id, l.name
            ORDER BY l.name
            "#,
        );

        let rows = self.fetch_all("location_totals", query)?;
        rows.iter()
            .map(|row| {
                Ok(LocationTotal {
                    name: column(row, "name")?,
                    unique_items: column(row, "unique_items")?,
                    total_quantity: quantity_total(row, "total_quantity")?,
                })
            })
            .collect()
    }

    /// Items ranked by quantity summed across locations.
    pub fn top_items(&mut self, limit: i64) -> LedgerResult<Vec<TopItem>> {
        let query = sqlx::query(
            r#"
            SELECT i.upc AS upc,
                   COALESCE(i.description, '') AS description,
                   TOTAL(inv.quantity)          AS total_quantity
            FROM items i
            JOIN inventory inv ON i.upc = inv.item_upc
            GROUP BY i.upc
            ORDER BY total_quantity DESC, i.upc
            LIMIT ?1
            "#,
        )
        .bind(limit);

        let rows = self.fetch_all("top_items", query)?;
        rows.iter()
            .map(|row| {
                Ok(TopItem {
                    item_code: item_code(row, "upc")?,
                    description: column(row, "description")?,
                    total_quantity: quantity_total(row, "total_quantity")?,
                })
            })
            .collect()
    }
}
