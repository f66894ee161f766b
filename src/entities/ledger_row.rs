//! Ledger row entity - one appended ledger entry in the SQL backend.
//!
//! Every ledger column is stored as text exactly as it would appear in a spreadsheet row,
//! so the SQL table and the CSV file share one row codec. The auto-increment `id`
//! fixes append order and is not part of the ledger columns.

use sea_orm::entity::prelude::*;

/// Ledger row database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    /// Append sequence number
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Purchase date, `day/month/year`
    pub purchase_date: String,
    pub area: String,
    pub congregation: String,
    pub person: String,
    pub role: String,
    pub product: String,
    pub kind: String,
    /// Two fraction digits
    pub unit_price: String,
    pub quantity: String,
    /// Two fraction digits
    pub total: String,
    /// `Paid` or `Pending`
    pub status: String,
    /// Empty unless the entry is paid
    pub payment_date: String,
    pub recorded_by: String,
}

/// Ledger rows reference nothing else
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
