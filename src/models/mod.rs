//! Plain domain types shared by every layer: ledger entries and reference tables.
//!
//! Nothing here performs I/O. Stores and reference sources produce these values,
//! the entry builder and query engine consume them.

/// Ledger entry model, status and expense enumerations, tolerant record dates
pub mod ledger;
/// Read-only reference tables that drive data entry
pub mod reference;

pub use ledger::{DATE_FORMAT, EXPENSE_PRODUCT, EntryStatus, ExpenseKind, LedgerEntry, RecordDate};
pub use reference::{AreaHierarchy, AreaRow, PriceList, PriceRow, ReferenceData, Roster, RosterRow};
