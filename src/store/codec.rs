//! Conversion between ledger entries and rows of text cells.
//!
//! Writers always emit [`LEDGER_COLUMNS`] in order. Readers locate the columns by header
//! name, so extra or reordered columns in an externally edited table are tolerated.

use super::LEDGER_COLUMNS;
use crate::{
    core::price::parse_price,
    errors::StoreError,
    models::{EntryStatus, LedgerEntry, RecordDate},
};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Number of canonical ledger columns.
pub const COLUMN_COUNT: usize = LEDGER_COLUMNS.len();

/// Renders an entry as cells in canonical column order.
#[must_use]
pub fn entry_to_row(entry: &LedgerEntry) -> [String; COLUMN_COUNT] {
    [
        entry.purchase_date.to_string(),
        entry.area.clone(),
        entry.congregation.clone(),
        entry.person.clone(),
        entry.role.clone(),
        entry.product.clone(),
        entry.kind.clone(),
        format!("{:.2}", entry.unit_price),
        entry.quantity.to_string(),
        format!("{:.2}", entry.total),
        entry.status.to_string(),
        entry
            .payment_date
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        entry.recorded_by.clone(),
    ]
}

/// Positions of the canonical columns inside a stored header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    positions: [usize; COLUMN_COUNT],
}

impl HeaderMap {
    /// The layout written by this crate.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            positions: std::array::from_fn(|index| index),
        }
    }

    /// Matches header cells to canonical columns, ignoring case and surrounding spaces.
    ///
    /// # Errors
    /// Returns [`StoreError::MissingColumn`] if any canonical column is absent.
    pub fn from_header<'a, I>(header: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: Vec<String> = header
            .into_iter()
            .map(|name| name.trim().to_lowercase())
            .collect();

        let mut positions = [0; COLUMN_COUNT];
        for (column, position) in LEDGER_COLUMNS.iter().zip(positions.iter_mut()) {
            *position = names
                .iter()
                .position(|name| name.as_str() == *column)
                .ok_or_else(|| StoreError::MissingColumn {
                    column: (*column).to_string(),
                })?;
        }
        Ok(Self { positions })
    }

    /// Picks the canonical cells out of a stored row. Short rows yield empty cells.
    #[must_use]
    pub fn select<'a, F>(&self, cell: F) -> [&'a str; COLUMN_COUNT]
    where
        F: Fn(usize) -> Option<&'a str>,
    {
        let mut cells = [""; COLUMN_COUNT];
        for (slot, position) in cells.iter_mut().zip(self.positions) {
            *slot = cell(position).unwrap_or("");
        }
        cells
    }

    /// Lays canonical cells out under a stored header of `width` columns.
    ///
    /// Columns the ledger does not know about are left empty.
    #[must_use]
    pub fn place(&self, cells: [String; COLUMN_COUNT], width: usize) -> Vec<String> {
        let mut row = vec![String::new(); width];
        for (cell, position) in cells.into_iter().zip(self.positions) {
            if let Some(slot) = row.get_mut(position) {
                *slot = cell;
            }
        }
        row
    }
}

fn malformed(row: usize, column: &'static str, value: &str) -> StoreError {
    StoreError::MalformedRow {
        row,
        column,
        value: value.to_string(),
    }
}

fn read_money(row: usize, column: &'static str, value: &str) -> Result<Decimal, StoreError> {
    Decimal::from_str(value.trim())
        .or_else(|_| parse_price(value))
        .map_err(|_| malformed(row, column, value))
}

/// Reads one stored row (cells in canonical order) back into an entry.
///
/// Unreadable dates are kept as [`RecordDate::Unreadable`]; any other unreadable cell fails.
///
/// # Errors
/// Returns [`StoreError::MalformedRow`] for bad numbers or an unknown status.
pub fn entry_from_cells(
    row: usize,
    cells: &[&str; COLUMN_COUNT],
) -> Result<LedgerEntry, StoreError> {
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
    ] = *cells;

    let quantity = quantity
        .trim()
        .parse::<u32>()
        .map_err(|_| malformed(row, "quantity", quantity))?;
    let status =
        EntryStatus::from_str(status).map_err(|_| malformed(row, "status", status))?;
    let payment_date = if payment_date.trim().is_empty() {
        None
    } else {
        Some(RecordDate::parse(payment_date))
    };

    Ok(LedgerEntry {
        purchase_date: RecordDate::parse(purchase_date),
        area: area.to_string(),
        congregation: congregation.to_string(),
        person: person.to_string(),
        role: role.to_string(),
        product: product.to_string(),
        kind: kind.to_string(),
        unit_price: read_money(row, "unit_price", unit_price)?,
        quantity,
        total: read_money(row, "total", total)?,
        status,
        payment_date,
        recorded_by: recorded_by.to_string(),
    })
}
