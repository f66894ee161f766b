//! Receipt Formatter.
//!
//! [`format_receipt`] lays out values that are already text; it performs no date or number
//! formatting. [`ReceiptFields::from_entry`] is the caller-side step that renders an entry's
//! values the same way the ledger stores them (`day/month/year` dates, two-digit decimals).

use crate::{
    models::LedgerEntry,
    store::{
        LEDGER_COLUMNS,
        codec::{COLUMN_COUNT, entry_to_row},
    },
};

/// First line of every receipt.
pub const RECEIPT_TITLE: &str = "LEDGER RECEIPT";

const SEPARATOR_WIDTH: usize = 50;

/// Pre-formatted receipt values, one per ledger column in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptFields {
    values: [String; COLUMN_COUNT],
}

impl ReceiptFields {
    /// Wraps values that are already formatted, in [`LEDGER_COLUMNS`] order.
    #[must_use]
    pub const fn new(values: [String; COLUMN_COUNT]) -> Self {
        Self { values }
    }

    /// Renders every field of `entry`; a pending entry gets an empty payment date.
    #[must_use]
    pub fn from_entry(entry: &LedgerEntry) -> Self {
        Self::new(entry_to_row(entry))
    }

    /// `(field, value)` pairs in canonical order.
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        LEDGER_COLUMNS
            .into_iter()
            .zip(self.values.iter().map(String::as_str))
    }
}

/// Renders the fixed receipt layout: title, separator, one `field: value` line per
/// column, closing separator.
#[must_use]
pub fn format_receipt(fields: &ReceiptFields) -> String {
    let separator = "-".repeat(SEPARATOR_WIDTH);
    let mut text = String::new();

    text.push_str(RECEIPT_TITLE);
    text.push('\n');
    text.push_str(&separator);
    text.push('\n');
    for (field, value) in fields.pairs() {
        text.push_str(&format!("{field}: {value}\n"));
    }
    text.push_str(&separator);
    text.push('\n');

    text
}
