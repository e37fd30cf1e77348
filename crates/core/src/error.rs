//! Ledger error model.

use thiserror::Error;

/// Result type used across the ledger crates.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Every fallible operation in the store, exporter, importer and aggregator
/// reports one of these kinds. Callers match on the variant; nothing in the
/// reconciliation path relies on catching a generic failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A location with this name already exists.
    #[error("location name already exists: {0}")]
    DuplicateName(String),

    /// A referenced item, location, path or bundle file does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A snapshot bundle is structurally incomplete or unparsable.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// The underlying persistence (database or filesystem) failed.
    #[error("storage failure: {0}")]
    StorageFailure(String),

    /// A value failed validation (e.g. blank name, malformed date).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl LedgerError {
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName(name.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid_snapshot(msg: impl Into<String>) -> Self {
        Self::InvalidSnapshot(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageFailure(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Stable lowercase tag for rendering the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::DuplicateName(_) => "duplicate_name",
            LedgerError::NotFound(_) => "not_found",
            LedgerError::InvalidSnapshot(_) => "invalid_snapshot",
            LedgerError::StorageFailure(_) => "storage_failure",
            LedgerError::Validation(_) => "validation",
        }
    }
}
