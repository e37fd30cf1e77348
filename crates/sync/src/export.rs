//! Snapshot export.

use std::path::Path;

use tracing::{info, instrument};

use stockscan_core::{LedgerResult, Timestamp, time};
use stockscan_store::LedgerStore;

use crate::bundle::{Snapshot, SnapshotMetadata};

/// Take a snapshot of `store`.
///
/// Locations and items are always exported in full. With `since`, only
/// inventory records scanned and events recorded at or after the cutoff are
/// included. All reads happen in one transaction.
#[instrument(skip(store), fields(workstation = %store.workstation()), err)]
pub fn export_snapshot(store: &LedgerStore, since: Option<Timestamp>) -> LedgerResult<Snapshot> {
    let (locations, items, inventory_records, scan_events) = store.transaction(|tx| {
        Ok((
            tx.all_locations()?,
            tx.all_items()?,
            tx.inventory_records(since.as_ref())?,
            tx.scan_events(since.as_ref())?,
        ))
    })?;

    Ok(Snapshot {
        metadata: SnapshotMetadata {
            export_date: time::now(),
            workstation: store.workstation().clone(),
            since_date: since,
        },
        locations,
        items,
        inventory_records,
        scan_events,
    })
}

/// Export `store` and write the bundle to `dir`.
pub fn export_bundle(
    store: &LedgerStore,
    dir: &Path,
    since: Option<Timestamp>,
) -> LedgerResult<Snapshot> {
    let snapshot = export_snapshot(store, since)?;
    snapshot.write_bundle(dir)?;

    info!(
        path = %dir.display(),
        locations = snapshot.locations.len(),
        items = snapshot.items.len(),
        inventory_records = snapshot.inventory_records.len(),
        scan_events = snapshot.scan_events.len(),
        "snapshot exported"
    );
    Ok(snapshot)
}
