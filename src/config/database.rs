//! Database configuration for the SQL ledger backend.
//!
//! This module resolves the connection URL, opens the `SeaORM` connection and creates the
//! ledger table from the entity definition using `Schema::create_table_from_entity`, so the
//! table layout always matches the Rust model without hand-written SQL.

use crate::entities::LedgerRow;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbBackend, Schema, Statement};
use std::path::Path;
use tracing::debug;

/// Connection URL used when neither the settings nor the environment provide one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/ledger.sqlite?mode=rwc";

/// Resolves the database URL: explicit setting, then `DATABASE_URL`, then the default file.
#[must_use]
pub fn get_database_url(configured: Option<&str>) -> String {
    configured.map_or_else(
        || std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
        str::to_string,
    )
}

/// Directory that must exist before `SQLite` can create the file named by `database_url`.
fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next().unwrap_or(path);
    Path::new(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
}

/// Establishes a connection to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to ledger database at {}", database_url);
    if let Some(dir) = sqlite_parent_dir(database_url) {
        std::fs::create_dir_all(dir)?;
    }
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates the ledger table if it does not exist yet.
///
/// Safe to call before every append; an existing table is left untouched.
pub async fn create_ledger_table<C: ConnectionTrait>(db: &C) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut ledger_table = schema.create_table_from_entity(LedgerRow);
    ledger_table.if_not_exists();

    db.execute(builder.build(&ledger_table)).await?;
    Ok(())
}

/// Reports whether the ledger table has been created.
pub async fn ledger_table_exists<C: ConnectionTrait>(db: &C) -> Result<bool> {
    let table = sea_orm::EntityName::table_name(&LedgerRow).to_string();
    let backend = db.get_database_backend();
    let sql = match backend {
        DbBackend::Sqlite => "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
        DbBackend::Postgres => {
            "SELECT table_name FROM information_schema.tables WHERE table_name = $1"
        }
        _ => "SELECT table_name FROM information_schema.tables WHERE table_name = ?",
    };

    let row = db
        .query_one(Statement::from_sql_and_values(backend, sql, [table.into()]))
        .await?;
    Ok(row.is_some())
}
