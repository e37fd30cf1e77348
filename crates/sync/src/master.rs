//! Master aggregation: fold many workstation snapshots into one ledger.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{info, instrument, warn};

use stockscan_core::{LedgerError, LedgerResult, WorkstationId};
use stockscan_inventory::ImportMode;
use stockscan_store::{LedgerStore, StoreConfig};

use crate::import::{ImportStats, import_bundle};

/// How the destination is prepared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterOptions {
    /// Merge sources on top of the existing destination instead of starting
    /// from an empty ledger. The backup is taken either way.
    pub keep_existing: bool,
    /// Identity recorded in the master store's configuration.
    pub workstation: WorkstationId,
}

impl Default for MasterOptions {
    fn default() -> Self {
        Self {
            keep_existing: false,
            workstation: WorkstationId::unknown(),
        }
    }
}

/// Outcome of a master build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasterReport {
    pub destination: PathBuf,
    /// Copy of the previous destination, if there was one.
    pub backup: Option<PathBuf>,
    pub applied: Vec<(PathBuf, ImportStats)>,
    pub failed: Vec<(PathBuf, LedgerError)>,
}

/// Build the master ledger at `destination` from snapshot bundles.
///
/// Each source is merged in order. A source that cannot be read or imported
/// is logged, recorded in the report and skipped. Failures touching the
/// destination itself abort the run.
#[instrument(skip(sources, options), fields(sources = sources.len(), keep_existing = options.keep_existing), err)]
pub fn build_master(
    sources: &[PathBuf],
    destination: &Path,
    options: &MasterOptions,
) -> LedgerResult<MasterReport> {
    let mut report = MasterReport {
        destination: destination.to_path_buf(),
        ..MasterReport::default()
    };

    if destination.exists() {
        let backup = backup_path(destination);
        fs::copy(destination, &backup).map_err(|e| {
            LedgerError::storage(format!(
                "failed to back up {} to {}: {e}",
                destination.display(),
                backup.display()
            ))
        })?;
        info!(backup = %backup.display(), "existing destination backed up");

        if !options.keep_existing {
            fs::remove_file(destination).map_err(|e| {
                LedgerError::storage(format!("failed to reset {}: {e}", destination.display()))
            })?;
        }
        report.backup = Some(backup);
    }

    let store = LedgerStore::open(StoreConfig::file(destination, options.workstation.clone()))?;

    for source in sources {
        info!(source = %source.display(), "importing source");
        match import_bundle(&store, source, ImportMode::Merge) {
            Ok(stats) => report.applied.push((source.clone(), stats)),
            Err(err) => {
                warn!(source = %source.display(), error = %err, "source skipped");
                report.failed.push((source.clone(), err));
            }
        }
    }

    info!(
        destination = %destination.display(),
        applied = report.applied.len(),
        failed = report.failed.len(),
        "master ledger built"
    );
    Ok(report)
}

/// `<destination>.backup.<YYYYmmdd_HHMMSS>` in local time.
fn backup_path(destination: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let mut name = destination.as_os_str().to_os_string();
    name.push(format!(".backup.{stamp}"));
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_name_appends_timestamp_suffix() {
        let path = backup_path(Path::new("/data/master_inventory.db"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();

        let suffix = name.strip_prefix("master_inventory.db.backup.").unwrap();
        assert_eq!(suffix.len(), "20240101_120000".len());
        assert_eq!(suffix.as_bytes()[8], b'_');
        assert!(suffix.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
        assert_eq!(path.parent(), Some(Path::new("/data")));
    }
}
