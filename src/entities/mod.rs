//! Entity module - `SeaORM` entity definitions for the SQL ledger backend.
//! The ledger is a single append-only table; each entity has a Model struct for data
//! and an Entity struct for operations.

pub mod ledger_row;

pub use ledger_row::{Column as LedgerRowColumn, Entity as LedgerRow, Model as LedgerRowModel};
