//! Ledger Store - the append-only log of ledger entries.
//!
//! [`LedgerStore`] is the one interface every backend implements: append a single entry,
//! or read every entry back in append order. Backends are chosen at runtime through
//! [`AnyLedgerStore`]; sessions receive the store they should use rather than reaching
//! for a global client.
//!
//! There is no locking or versioning. Two operators appending at the same time simply
//! interleave their rows.

/// Entry/row conversion shared by all tabular backends
pub mod codec;
/// Local CSV file backend
pub mod csv_file;
/// In-memory backend
pub mod memory;
/// SQL table backend through `SeaORM`
pub mod sql;

pub use csv_file::CsvLedgerStore;
pub use memory::MemoryLedgerStore;
pub use sql::SqlLedgerStore;

use crate::{
    config::{LedgerSettings, database},
    errors::{Result, StoreError},
    models::LedgerEntry,
};
use tracing::info;

/// Canonical ledger header. Writers must emit exactly this order.
pub const LEDGER_COLUMNS: [&str; 13] = [
    "purchase_date",
    "area",
    "congregation",
    "person",
    "role",
    "product",
    "kind",
    "unit_price",
    "quantity",
    "total",
    "status",
    "payment_date",
    "recorded_by",
];

/// Result type used by ledger backends.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Append-only storage for ledger entries.
#[allow(async_fn_in_trait)]
pub trait LedgerStore {
    /// Appends exactly one entry, creating the table and its header row on first use.
    async fn append(&self, entry: &LedgerEntry) -> StoreResult<()>;

    /// Reads every stored entry in append order.
    ///
    /// Fails with [`StoreError::TableMissing`] when nothing has ever been appended.
    async fn load_all(&self) -> StoreResult<Vec<LedgerEntry>>;
}

/// Reads the whole ledger, treating a table that does not exist yet as empty.
///
/// # Errors
/// Any store failure other than a missing table.
pub async fn load_or_empty<S: LedgerStore>(store: &S) -> StoreResult<Vec<LedgerEntry>> {
    match store.load_all().await {
        Err(e) if e.is_missing_table() => {
            info!("Ledger table not created yet; treating it as empty ({})", e);
            Ok(Vec::new())
        }
        other => other,
    }
}

/// A ledger store picked from configuration at runtime.
#[derive(Debug)]
pub enum AnyLedgerStore {
    /// CSV file backend
    Csv(CsvLedgerStore),
    /// SQL backend
    Sql(SqlLedgerStore),
}

impl AnyLedgerStore {
    /// Opens the backend described by `settings`.
    ///
    /// # Errors
    /// Returns an error if the SQL connection cannot be established.
    pub async fn open(settings: &LedgerSettings) -> Result<Self> {
        match settings {
            LedgerSettings::Csv { path } => Ok(Self::Csv(CsvLedgerStore::new(path))),
            LedgerSettings::Sqlite { database_url } => {
                let url = database::get_database_url(database_url.as_deref());
                let db = database::create_connection(&url).await?;
                Ok(Self::Sql(SqlLedgerStore::new(db)))
            }
        }
    }
}

impl LedgerStore for AnyLedgerStore {
    async fn append(&self, entry: &LedgerEntry) -> StoreResult<()> {
        match self {
            Self::Csv(store) => store.append(entry).await,
            Self::Sql(store) => store.append(entry).await,
        }
    }

    async fn load_all(&self) -> StoreResult<Vec<LedgerEntry>> {
        match self {
            Self::Csv(store) => store.load_all().await,
            Self::Sql(store) => store.load_all().await,
        }
    }
}
