//! SQL ledger backend through `SeaORM`.
//!
//! Rows are stored as text cells with the same codec as the CSV backend, so a ledger can be
//! moved between backends without reformatting. Append order is the auto-increment id.

use super::{
    LedgerStore, StoreResult,
    codec::{entry_from_cells, entry_to_row},
};
use crate::{
    config::database,
    entities::{LedgerRow, LedgerRowColumn, ledger_row},
    errors::{Error, StoreError},
    models::LedgerEntry,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityName, EntityTrait, QueryOrder, Set};
use tracing::{debug, instrument};

/// Ledger stored in a SQL table.
#[derive(Debug, Clone)]
pub struct SqlLedgerStore {
    db: DatabaseConnection,
}

/// Table helpers in `config::database` return the crate error; unwrap it back to the store's.
fn into_store_error(error: Error) -> StoreError {
    match error {
        Error::Store(store) => store,
        Error::Database(db) => StoreError::Database(db),
        other => StoreError::Unavailable {
            message: other.to_string(),
        },
    }
}

impl SqlLedgerStore {
    /// Wraps an open connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Underlying database connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn to_active_model(entry: &LedgerEntry) -> ledger_row::ActiveModel {
    let [
        purchase_date,
        area,
        congregation,
        person,
        role,
        product,
        kind,
        unit_price,
        quantity,
        total,
        status,
        payment_date,
        recorded_by,
    ] = entry_to_row(entry);

    ledger_row::ActiveModel {
        purchase_date: Set(purchase_date),
        area: Set(area),
        congregation: Set(congregation),
        person: Set(person),
        role: Set(role),
        product: Set(product),
        kind: Set(kind),
        unit_price: Set(unit_price),
        quantity: Set(quantity),
        total: Set(total),
        status: Set(status),
        payment_date: Set(payment_date),
        recorded_by: Set(recorded_by),
        ..Default::default()
    }
}

fn from_model(row: usize, model: &ledger_row::Model) -> StoreResult<LedgerEntry> {
    let cells = [
        model.purchase_date.as_str(),
        model.area.as_str(),
        model.congregation.as_str(),
        model.person.as_str(),
        model.role.as_str(),
        model.product.as_str(),
        model.kind.as_str(),
        model.unit_price.as_str(),
        model.quantity.as_str(),
        model.total.as_str(),
        model.status.as_str(),
        model.payment_date.as_str(),
        model.recorded_by.as_str(),
    ];
    entry_from_cells(row, &cells)
}

impl LedgerStore for SqlLedgerStore {
    #[instrument(skip(self, entry))]
    async fn append(&self, entry: &LedgerEntry) -> StoreResult<()> {
        database::create_ledger_table(&self.db)
            .await
            .map_err(into_store_error)?;

        let inserted = to_active_model(entry).insert(&self.db).await?;
        debug!("Appended ledger row #{}", inserted.id);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn load_all(&self) -> StoreResult<Vec<LedgerEntry>> {
        if !database::ledger_table_exists(&self.db)
            .await
            .map_err(into_store_error)?
        {
            return Err(StoreError::TableMissing {
                table: LedgerRow.table_name().to_string(),
            });
        }

        let models = LedgerRow::find()
            .order_by_asc(LedgerRowColumn::Id)
            .all(&self.db)
            .await?;

        let entries = models
            .iter()
            .enumerate()
            .map(|(index, model)| from_model(index + 1, model))
            .collect::<StoreResult<Vec<_>>>()?;

        debug!("Read {} ledger rows", entries.len());
        Ok(entries)
    }
}
