//! Ledger schema, created idempotently when a store is opened.
//!
//! Timestamps are TEXT in canonical form so that `ORDER BY` and `>=`
//! comparisons on them are chronological. No foreign keys: imports may carry
//! records whose location was rejected by a name collision.

pub(crate) const STATEMENTS: &[(&str, &str)] = &[
    (
        "create_locations",
        r#"
        CREATE TABLE IF NOT EXISTS locations (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL UNIQUE,
            description TEXT,
            created_at  TEXT NOT NULL
        )
        "#,
    ),
    (
        "create_items",
        r#"
        CREATE TABLE IF NOT EXISTS items (
            upc             TEXT PRIMARY KEY,
            description     TEXT,
            additional_info TEXT,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        )
        "#,
    ),
    (
        "create_inventory",
        r#"
        CREATE TABLE IF NOT EXISTS inventory (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            item_upc     TEXT NOT NULL,
            location_id  TEXT NOT NULL,
            quantity     INTEGER NOT NULL DEFAULT 0,
            last_scanned TEXT NOT NULL,
            UNIQUE (item_upc, location_id)
        )
        "#,
    ),
    (
        "create_scan_history",
        r#"
        CREATE TABLE IF NOT EXISTS scan_history (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            item_upc        TEXT NOT NULL,
            location_id     TEXT NOT NULL,
            action          TEXT NOT NULL,
            quantity_change INTEGER NOT NULL,
            scanned_at      TEXT NOT NULL,
            workstation_id  TEXT NOT NULL
        )
        "#,
    ),
    (
        "create_inventory_last_scanned_index",
        "CREATE INDEX IF NOT EXISTS idx_inventory_last_scanned ON inventory (last_scanned)",
    ),
    (
        "create_scan_history_scanned_at_index",
        "CREATE INDEX IF NOT EXISTS idx_scan_history_scanned_at ON scan_history (scanned_at)",
    ),
];
