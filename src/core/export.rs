//! CSV export of ledger entries, using the same header and cell formats as the ledger.

use crate::{
    errors::Result,
    models::LedgerEntry,
    store::{LEDGER_COLUMNS, codec::entry_to_row},
};
use csv::Writer;
use std::io::Write;
use tracing::debug;

/// Writes a header row and one row per entry to `writer`.
///
/// # Errors
/// Returns an error if writing to `writer` fails.
pub fn write_csv<W: Write>(entries: &[LedgerEntry], writer: W) -> Result<()> {
    let mut csv = Writer::from_writer(writer);
    csv.write_record(LEDGER_COLUMNS)?;
    for entry in entries {
        csv.write_record(entry_to_row(entry))?;
    }
    csv.flush()?;

    debug!("Exported {} entries as CSV", entries.len());
    Ok(())
}
