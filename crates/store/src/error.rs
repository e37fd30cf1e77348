use stockscan_core::LedgerError;

/// Map a sqlx error raised while running `operation` to a ledger error.
///
/// Unique violations are left to callers that can name the conflicting value;
/// here every database failure is a storage failure.
pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> LedgerError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
            LedgerError::storage(format!(
                "database error in {operation} (code {code}): {}",
                db_err.message()
            ))
        }
        sqlx::Error::PoolClosed => {
            LedgerError::storage(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::RowNotFound => {
            // Lookups use fetch_optional.
            LedgerError::storage(format!("unexpected row not found in {operation}"))
        }
        sqlx::Error::Io(io) => LedgerError::storage(format!("io error in {operation}: {io}")),
        _ => LedgerError::storage(format!("sqlx error in {operation}: {err}")),
    }
}

/// Whether `err` is a UNIQUE / PRIMARY KEY constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
