//! In-memory ledger backend.
//!
//! Behaves like the persistent backends, including reporting a missing table until the
//! first append, which makes it a faithful stand-in for sessions under test.

use super::{LedgerStore, StoreResult};
use crate::{errors::StoreError, models::LedgerEntry};
use std::sync::{Mutex, PoisonError};

/// Ledger held in process memory.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    rows: Mutex<Option<Vec<LedgerEntry>>>,
}

impl MemoryLedgerStore {
    /// An empty store whose table has not been created yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `entries`, as if they had been appended in order.
    #[must_use]
    pub fn with_entries(entries: Vec<LedgerEntry>) -> Self {
        Self {
            rows: Mutex::new(Some(entries)),
        }
    }
}

impl LedgerStore for MemoryLedgerStore {
    async fn append(&self, entry: &LedgerEntry) -> StoreResult<()> {
        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        rows.get_or_insert_with(Vec::new).push(entry.clone());
        Ok(())
    }

    async fn load_all(&self) -> StoreResult<Vec<LedgerEntry>> {
        let rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        rows.clone().ok_or_else(|| StoreError::TableMissing {
            table: "memory".to_string(),
        })
    }
}
