//! SQLite-backed ledger store.
//!
//! A blocking façade over `sqlx`: each store owns a current-thread Tokio
//! runtime and a single-connection pool, and every public operation runs its
//! query future to completion before returning.

pub mod config;
mod error;
mod rows;
mod schema;
pub mod store;
pub mod tx;
pub mod views;


pub use config::{StoreConfig, StoreLocation};
pub use store::LedgerStore;
pub use tx::LedgerTx;
pub use views::{ItemStock, LedgerSummary, LocationStock, LocationTotal, TopItem};
