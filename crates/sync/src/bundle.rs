//! Snapshot bundles: one directory, one pretty-printed JSON file per entity class.

use std::fs;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use stockscan_core::time::serde_lenient;
use stockscan_core::{
    InventoryRecord, Item, LedgerError, LedgerResult, Location, ScanEvent, Timestamp, WorkstationId,
};

pub const METADATA_FILE: &str = "metadata.json";
pub const LOCATIONS_FILE: &str = "locations.json";
pub const ITEMS_FILE: &str = "items.json";
pub const INVENTORY_FILE: &str = "inventory.json";
pub const SCAN_HISTORY_FILE: &str = "scan_history.json";

/// Descriptor written alongside the entity files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    #[serde(with = "serde_lenient")]
    pub export_date: Timestamp,
    #[serde(default = "WorkstationId::unknown")]
    pub workstation: WorkstationId,
    /// Cutoff applied to inventory records and scan events, if any.
    #[serde(default, with = "serde_lenient::option")]
    pub since_date: Option<Timestamp>,
}

/// Point-in-time copy of a store's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    pub locations: Vec<Location>,
    pub items: Vec<Item>,
    pub inventory_records: Vec<InventoryRecord>,
    pub scan_events: Vec<ScanEvent>,
}

impl Snapshot {
    /// Write the bundle into `dir`, creating it if needed. Existing bundle
    /// files are overwritten.
    pub fn write_bundle(&self, dir: &Path) -> LedgerResult<()> {
        fs::create_dir_all(dir).map_err(|e| io_failure("create", dir, e))?;

        write_json(dir, METADATA_FILE, &self.metadata)?;
        write_json(dir, LOCATIONS_FILE, &self.locations)?;
        write_json(dir, ITEMS_FILE, &self.items)?;
        write_json(dir, INVENTORY_FILE, &self.inventory_records)?;
        write_json(dir, SCAN_HISTORY_FILE, &self.scan_events)?;
        Ok(())
    }

    /// Load a bundle from `dir`.
    ///
    /// A missing directory is [`LedgerError::NotFound`]; a missing or
    /// malformed file is [`LedgerError::InvalidSnapshot`].
    pub fn read_bundle(dir: &Path) -> LedgerResult<Self> {
        if !dir.is_dir() {
            return Err(LedgerError::not_found(format!("snapshot directory {}", dir.display())));
        }

        Ok(Self {
            metadata: read_json(dir, METADATA_FILE)?,
            locations: read_json(dir, LOCATIONS_FILE)?,
            items: read_json(dir, ITEMS_FILE)?,
            inventory_records: read_json(dir, INVENTORY_FILE)?,
            scan_events: read_json(dir, SCAN_HISTORY_FILE)?,
        })
    }
}

fn write_json<T: Serialize + ?Sized>(dir: &Path, file: &str, value: &T) -> LedgerResult<()> {
    let path = dir.join(file);
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| LedgerError::storage(format!("failed to serialize {file}: {e}")))?;
    fs::write(&path, json).map_err(|e| io_failure("write", &path, e))
}

fn read_json<T: DeserializeOwned>(dir: &Path, file: &str) -> LedgerResult<T> {
    let path = dir.join(file);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(LedgerError::invalid_snapshot(format!(
                "{} is missing {file}",
                dir.display()
            )));
        }
        Err(e) => return Err(io_failure("read", &path, e)),
    };

    serde_json::from_str(&raw)
        .map_err(|e| LedgerError::invalid_snapshot(format!("{}: {e}", path.display())))
}

fn io_failure(action: &str, path: &Path, err: io::Error) -> LedgerError {
    LedgerError::storage(format!("failed to {action} {}: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use stockscan_core::time::parse_timestamp;

    fn write(dir: &Path, file: &str, body: &str) {
        fs::write(dir.join(file), body).unwrap();
    }

    fn legacy_bundle(dir: &Path) {
        write(
            dir,
            METADATA_FILE,
            r#"{"export_date": "2024-02-03T04:05:06.789012", "workstation": "FRONT-DESK", "since_date": null}"#,
        );
        write(
            dir,
            LOCATIONS_FILE,
            r#"[{"id": "9b1f", "name": "Shelf A", "description": null, "created_at": "2024-01-01T08:00:00"}]"#,
        );
        write(
            dir,
            ITEMS_FILE,
            r#"[{"upc": "012345678905", "description": "Widget", "additional_info": "{}",
                 "created_at": "2024-01-01T08:00:00", "updated_at": "2024-01-02T08:00:00"}]"#,
        );
        write(
            dir,
            INVENTORY_FILE,
            r#"[{"id": 1, "item_upc": "012345678905", "location_id": "9b1f", "quantity": 3,
                 "last_scanned": "2024-01-02T08:00:00"}]"#,
        );
        write(
            dir,
            SCAN_HISTORY_FILE,
            r#"[{"id": 1, "item_upc": "012345678905", "location_id": "9b1f", "action": "scan",
                 "quantity_change": 1, "scanned_at": "2024-01-02T08:00:00", "workstation_id": "FRONT-DESK"}]"#,
        );
    }

    #[test]
    fn reads_bundles_written_by_older_tools() {
        let dir = tempfile::tempdir().unwrap();
        legacy_bundle(dir.path());

        let snapshot = Snapshot::read_bundle(dir.path()).unwrap();
        assert_eq!(snapshot.metadata.workstation.as_str(), "FRONT-DESK");
        assert_eq!(snapshot.metadata.since_date, None);
        assert_eq!(snapshot.locations[0].description, "");
        assert_eq!(snapshot.inventory_records[0].quantity, 3);
        assert_eq!(
            snapshot.scan_events[0].scanned_at,
            parse_timestamp("2024-01-02T08:00:00Z").unwrap()
        );
    }

    #[test]
    fn written_bundle_reads_back_identically() {
        let dir = tempfile::tempdir().unwrap();
        legacy_bundle(dir.path());
        let snapshot = Snapshot::read_bundle(dir.path()).unwrap();

        let out = dir.path().join("copy");
        snapshot.write_bundle(&out).unwrap();
        assert_eq!(Snapshot::read_bundle(&out).unwrap(), snapshot);

        let metadata = fs::read_to_string(out.join(METADATA_FILE)).unwrap();
        assert!(metadata.contains("\n  \"export_date\": \"2024-02-03T04:05:06.789012Z\""));
    }

    #[test]
    fn missing_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Snapshot::read_bundle(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[test]
    fn missing_or_malformed_files_are_invalid() {
        let dir = tempfile::tempdir().unwrap();
        legacy_bundle(dir.path());
        fs::remove_file(dir.path().join(ITEMS_FILE)).unwrap();
        let err = Snapshot::read_bundle(dir.path()).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidSnapshot(_)));

        legacy_bundle(dir.path());
        write(dir.path(), INVENTORY_FILE, r#"{"not": "a list"}"#);
        let err = Snapshot::read_bundle(dir.path()).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidSnapshot(_)));
    }
}
