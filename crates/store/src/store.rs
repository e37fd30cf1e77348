//! The ledger store: opening, transactions and the workstation operations.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, instrument};

use stockscan_core::{
    Attributes, InventoryRecord, Item, ItemCode, LedgerError, LedgerResult, Location, LocationId,
    ScanEvent, Timestamp, WorkstationId, time,
};
use stockscan_inventory::{RecordScan, plan_scan};

use crate::config::{StoreConfig, StoreLocation};
use crate::error::map_sqlx_error;
use crate::schema;
use crate::tx::LedgerTx;
use crate::views::{ItemStock, LedgerSummary, LocationStock, LocationTotal, TopItem};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A workstation's ledger.
///
/// Owns its runtime and connection; not shared between threads.
pub struct LedgerStore {
    // Dropped before `rt`.
    pool: SqlitePool,
    rt: Runtime,
    config: StoreConfig,
}

impl std::fmt::Debug for LedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerStore")
            .field("location", &self.config.location)
            .field("workstation", &self.config.workstation)
            .finish()
    }
}

impl LedgerStore {
    /// Open a store, creating the database file and schema if needed.
    pub fn open(config: StoreConfig) -> LedgerResult<Self> {
        let rt = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LedgerError::storage(format!("failed to start runtime: {e}")))?;

        let options = match &config.location {
            StoreLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true),
            StoreLocation::InMemory => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| map_sqlx_error("connect_options", e))?,
        }
        .foreign_keys(false)
        .journal_mode(SqliteJournalMode::Delete)
        .busy_timeout(BUSY_TIMEOUT);

        // One long-lived connection: an in-memory database lives exactly as
        // long as its connection.
        let pool = rt
            .block_on(
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None::<Duration>)
                    .max_lifetime(None::<Duration>)
                    .connect_with(options),
            )
            .map_err(|e| match &config.location {
                StoreLocation::File(path) => {
                    LedgerError::storage(format!("failed to open {}: {e}", path.display()))
                }
                StoreLocation::InMemory => map_sqlx_error("connect", e),
            })?;

        for (operation, sql) in schema::STATEMENTS {
            rt.block_on(sqlx::query(sql).execute(&pool))
                .map_err(|e| map_sqlx_error(operation, e))?;
        }

        debug!(location = ?config.location, workstation = %config.workstation, "ledger store opened");
        Ok(Self { pool, rt, config })
    }

    /// Open a store that must already exist on disk.
    pub fn open_existing(config: StoreConfig) -> LedgerResult<Self> {
        if let StoreLocation::File(path) = &config.location {
            if !path.is_file() {
                return Err(LedgerError::not_found(format!("database {}", path.display())));
            }
        }
        Self::open(config)
    }

    pub fn workstation(&self) -> &WorkstationId {
        &self.config.workstation
    }

    pub fn path(&self) -> Option<&Path> {
        self.config.path()
    }

    /// Run `f` in one transaction: committed if it returns `Ok`, rolled back
    /// otherwise.
    ///
    /// The store's single connection is held by the transaction, so `f` must
    /// only use the [`LedgerTx`] it is given.
    pub fn transaction<T>(
        &self,
        f: impl FnOnce(&mut LedgerTx<'_>) -> LedgerResult<T>,
    ) -> LedgerResult<T> {
        let tx = self
            .rt
            .block_on(self.pool.begin())
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;
        let mut ledger_tx = LedgerTx { rt: &self.rt, tx };

        match f(&mut ledger_tx) {
            Ok(value) => {
                self.rt
                    .block_on(ledger_tx.tx.commit())
                    .map_err(|e| map_sqlx_error("commit", e))?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.rt.block_on(ledger_tx.tx.rollback()) {
                    tracing::error!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }

    // --- writes ---

    /// Create a location with a fresh id.
    #[instrument(skip(self, description), err)]
    pub fn add_location(&self, name: &str, description: &str) -> LedgerResult<LocationId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::validation("location name cannot be empty"));
        }

        let location = Location {
            id: LocationId::generate(),
            name: name.to_string(),
            description: description.trim().to_string(),
            created_at: time::now(),
        };

        self.transaction(|tx| {
            if tx.location_by_name(&location.name)?.is_some() {
                return Err(LedgerError::duplicate_name(location.name.clone()));
            }
            tx.insert_location(&location)
        })?;

        info!(location_id = %location.id, name = %location.name, "location added");
        Ok(location.id)
    }

    /// Record `delta` units of `code` at a location.
    ///
    /// Creates the item on first sight, upserts the quantity and appends a
    /// scan event, all in one transaction.
    #[instrument(skip(self), fields(workstation = %self.config.workstation), err)]
    pub fn record_scan(
        &self,
        code: &ItemCode,
        location_id: &LocationId,
        delta: i64,
    ) -> LedgerResult<InventoryRecord> {
        let cmd = RecordScan {
            item_code: code.clone(),
            location_id: location_id.clone(),
            delta,
            scanned_at: time::now(),
            workstation: self.config.workstation.clone(),
        };

        let record = self.transaction(|tx| {
            if tx.location(&cmd.location_id)?.is_none() {
                return Err(LedgerError::not_found(format!("location {}", cmd.location_id)));
            }
            let item_known = tx.item(&cmd.item_code)?.is_some();
            let existing = tx.record(&cmd.item_code, &cmd.location_id)?;

            let effects = plan_scan(&cmd, item_known, existing.as_ref());
            if let Some(item) = &effects.new_item {
                tx.upsert_item(item)?;
            }
            tx.upsert_record(&effects.record)?;
            tx.append_event(&effects.event)?;
            Ok(effects.record)
        })?;

        debug!(quantity = record.quantity, "scan recorded");
        Ok(record)
    }

    /// Replace an item's description. The item must exist.
    pub fn set_item_description(&self, code: &ItemCode, description: &str) -> LedgerResult<Item> {
        self.update_item(code, |item| item.description = description.to_string())
    }

    /// Replace an item's attributes as a whole. The item must exist.
    pub fn set_item_attributes(&self, code: &ItemCode, attributes: Attributes) -> LedgerResult<Item> {
        self.update_item(code, move |item| item.attributes = attributes)
    }

    fn update_item(&self, code: &ItemCode, change: impl FnOnce(&mut Item)) -> LedgerResult<Item> {
        self.transaction(|tx| {
            let mut item = tx
                .item(code)?
                .ok_or_else(|| LedgerError::not_found(format!("item {code}")))?;
            change(&mut item);
            item.updated_at = time::now();
            tx.upsert_item(&item)?;
            Ok(item)
        })
    }

    /// Create or update an item's description and attributes.
    pub fn save_item(
        &self,
        code: &ItemCode,
        description: &str,
        attributes: Attributes,
    ) -> LedgerResult<Item> {
        let now = time::now();
        self.transaction(|tx| {
            let item = match tx.item(code)? {
                Some(existing) => Item {
                    description: description.to_string(),
                    attributes,
                    updated_at: now,
                    ..existing
                },
                None => Item {
                    description: description.to_string(),
                    attributes,
                    ..Item::first_seen(code.clone(), now)
                },
            };
            tx.upsert_item(&item)?;
            Ok(item)
        })
    }

    // --- reads ---

    pub fn location(&self, id: &LocationId) -> LedgerResult<Option<Location>> {
        self.transaction(|tx| tx.location(id))
    }

    pub fn location_by_name(&self, name: &str) -> LedgerResult<Option<Location>> {
        self.transaction(|tx| tx.location_by_name(name.trim()))
    }

    /// Look a location up by id, then by name.
    pub fn resolve_location(&self, id_or_name: &str) -> LedgerResult<Location> {
        let key = id_or_name.trim();
        self.transaction(|tx| {
            if let Ok(id) = LocationId::parse(key) {
                if let Some(location) = tx.location(&id)? {
                    return Ok(location);
                }
            }
            tx.location_by_name(key)?
                .ok_or_else(|| LedgerError::not_found(format!("location {key:?}")))
        })
    }

    pub fn item(&self, code: &ItemCode) -> LedgerResult<Option<Item>> {
        self.transaction(|tx| tx.item(code))
    }

    /// All locations ordered by name.
    pub fn list_locations(&self) -> LedgerResult<Vec<Location>> {
        self.transaction(|tx| tx.all_locations())
    }

    /// What is at a location, most recently scanned first.
    pub fn list_inventory_at(&self, location_id: &LocationId) -> LedgerResult<Vec<ItemStock>> {
        self.transaction(|tx| tx.inventory_at(location_id))
    }

    /// Where an item is, most recently scanned first.
    pub fn list_locations_for(&self, code: &ItemCode) -> LedgerResult<Vec<LocationStock>> {
        self.transaction(|tx| tx.locations_for(code))
    }

    pub fn all_locations(&self) -> LedgerResult<Vec<Location>> {
        self.transaction(|tx| tx.all_locations())
    }

    pub fn all_items(&self) -> LedgerResult<Vec<Item>> {
        self.transaction(|tx| tx.all_items())
    }

    pub fn inventory_records(&self, since: Option<&Timestamp>) -> LedgerResult<Vec<InventoryRecord>> {
        self.transaction(|tx| tx.inventory_records(since))
    }

    pub fn scan_events(&self, since: Option<&Timestamp>) -> LedgerResult<Vec<ScanEvent>> {
        self.transaction(|tx| tx.scan_events(since))
    }

    // --- report projections ---

    pub fn summary(&self) -> LedgerResult<LedgerSummary> {
        self.transaction(|tx| tx.summary())
    }

    pub fn location_totals(&self) -> LedgerResult<Vec<LocationTotal>> {
        self.transaction(|tx| tx.location_totals())
    }

    pub fn top_items(&self, limit: i64) -> LedgerResult<Vec<TopItem>> {
        self.transaction(|tx| tx.top_items(limit))
    }
}

impl Drop for LedgerStore {
    fn drop(&mut self) {
        // Returning connections to the pool needs a runtime context.
        self.rt.block_on(self.pool.close());
    }
}
