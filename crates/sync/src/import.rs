//! Snapshot import: reconcile every entity class into a store in one transaction.

use std::path::Path;

use tracing::{debug, info, instrument, warn};

use stockscan_core::LedgerResult;
use stockscan_inventory::{
    ImportMode, Resolution, reconcile_item, reconcile_location, reconcile_record,
};
use stockscan_store::{LedgerStore, LedgerTx};

use crate::bundle::Snapshot;

/// Row counts for one entity class.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct EntityStats {
    pub inserted: usize,
    pub overwritten: usize,
    pub kept: usize,
    pub skipped: usize,
}

impl EntityStats {
    fn tally<T>(&mut self, resolution: &Resolution<T>) {
        match resolution {
            Resolution::Insert(_) => self.inserted += 1,
            Resolution::Overwrite(_) => self.overwritten += 1,
            Resolution::Keep => self.kept += 1,
            Resolution::Skip(_) => self.skipped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.inserted + self.overwritten + self.kept + self.skipped
    }
}

/// Outcome of one import.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub locations: EntityStats,
    pub items: EntityStats,
    pub inventory_records: EntityStats,
    pub events_appended: usize,
}

/// Import `snapshot` into `store`.
///
/// Entity classes are applied in dependency order (locations, items,
/// inventory records, scan events). Either everything is applied or, on
/// error, nothing is.
#[instrument(
    skip(store, snapshot),
    fields(source = %snapshot.metadata.workstation, mode = ?mode),
    err
)]
pub fn import_snapshot(
    store: &LedgerStore,
    snapshot: &Snapshot,
    mode: ImportMode,
) -> LedgerResult<ImportStats> {
    let stats = store.transaction(|tx| {
        let mut stats = ImportStats::default();
        import_locations(tx, snapshot, mode, &mut stats)?;
        import_items(tx, snapshot, mode, &mut stats)?;
        import_records(tx, snapshot, mode, &mut stats)?;

        for event in &snapshot.scan_events {
            tx.append_event(event)?;
            stats.events_appended += 1;
        }
        Ok(stats)
    })?;

    info!(
        exported_at = %stockscan_core::time::format_timestamp(&snapshot.metadata.export_date),
        locations = ?stats.locations,
        items = ?stats.items,
        inventory_records = ?stats.inventory_records,
        events = stats.events_appended,
        "snapshot imported"
    );
    Ok(stats)
}

/// Load the bundle at `dir` and import it.
pub fn import_bundle(store: &LedgerStore, dir: &Path, mode: ImportMode) -> LedgerResult<ImportStats> {
    let snapshot = Snapshot::read_bundle(dir)?;
    import_snapshot(store, &snapshot, mode)
}

fn import_locations(
    tx: &mut LedgerTx<'_>,
    snapshot: &Snapshot,
    mode: ImportMode,
    stats: &mut ImportStats,
) -> LedgerResult<()> {
    for incoming in &snapshot.locations {
        let by_id = tx.location(&incoming.id)?;
        let by_name = tx.location_by_name(&incoming.name)?;
        let resolution = reconcile_location(mode, by_id.as_ref(), by_name.as_ref(), incoming.clone());
        stats.locations.tally(&resolution);

        match &resolution {
            Resolution::Insert(location) if mode == ImportMode::Merge => tx.insert_location(location)?,
            Resolution::Insert(location) | Resolution::Overwrite(location) => {
                tx.replace_location(location)?
            }
            Resolution::Keep => {}
            Resolution::Skip(reason) => {
                warn!(location_id = %incoming.id, name = %incoming.name, %reason, "location skipped");
            }
        }
    }
    Ok(())
}

fn import_items(
    tx: &mut LedgerTx<'_>,
    snapshot: &Snapshot,
    mode: ImportMode,
    stats: &mut ImportStats,
) -> LedgerResult<()> {
    for incoming in &snapshot.items {
        let existing = tx.item(&incoming.code)?;
        let resolution = reconcile_item(mode, existing.as_ref(), incoming.clone());
        stats.items.tally(&resolution);

        if let Some(item) = resolution.value() {
            tx.upsert_item(item)?;
        } else {
            debug!(code = %incoming.code, "stored item is newer, kept");
        }
    }
    Ok(())
}

fn import_records(
    tx: &mut LedgerTx<'_>,
    snapshot: &Snapshot,
    mode: ImportMode,
    stats: &mut ImportStats,
) -> LedgerResult<()> {
    for incoming in &snapshot.inventory_records {
        let existing = tx.record(&incoming.item_code, &incoming.location_id)?;
        let resolution = reconcile_record(mode, existing.as_ref(), incoming.clone());
        stats.inventory_records.tally(&resolution);

        if let Some(record) = resolution.value() {
            tx.upsert_record(record)?;
        }
    }
    Ok(())
}
