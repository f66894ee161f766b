//! Local CSV file backend.
//!
//! The file plays the role of a spreadsheet tab: a header row followed by one row per entry.
//! People may open and edit it by hand, so reading is lenient about column order, extra
//! columns, short rows and surrounding whitespace.

use super::{
    LEDGER_COLUMNS, LedgerStore, StoreResult,
    codec::{COLUMN_COUNT, HeaderMap, entry_from_cells, entry_to_row},
};
use crate::{errors::StoreError, models::LedgerEntry};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::{
    fs::{self, File, OpenOptions},
    io::{Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument};

/// Ledger stored in a CSV file with a header row.
#[derive(Debug, Clone)]
pub struct CsvLedgerStore {
    path: PathBuf,
}

impl CsvLedgerStore {
    /// Uses the file at `path`; it is created on the first append.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Location of the ledger file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A file that does not exist or holds zero bytes has no header yet.
    fn needs_header(&self) -> StoreResult<bool> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() == 0),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    /// Column layout of the existing header row and its width.
    fn stored_layout(&self) -> StoreResult<(HeaderMap, usize)> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_path(&self.path)?;
        let header = reader.headers()?;
        Ok((HeaderMap::from_header(header.iter())?, header.len()))
    }

    fn missing_table(&self) -> StoreError {
        StoreError::TableMissing {
            table: self.path.display().to_string(),
        }
    }
}

/// Whether the last byte of a non-empty file is a line feed.
fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    let mut last = [0; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

impl LedgerStore for CsvLedgerStore {
    #[instrument(skip(self, entry), fields(path = %self.path.display()))]
    async fn append(&self, entry: &LedgerEntry) -> StoreResult<()> {
        let write_header = self.needs_header()?;
        let (map, width) = if write_header {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            (HeaderMap::canonical(), COLUMN_COUNT)
        } else {
            self.stored_layout()?
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if !write_header && !ends_with_newline(&mut file)? {
            file.write_all(b"\n")?;
        }
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        if write_header {
            info!("Creating ledger file with header row");
            writer.write_record(LEDGER_COLUMNS)?;
        }
        writer.write_record(map.place(entry_to_row(entry), width))?;
        writer.flush()?;

        debug!("Appended ledger row for {}", entry.person);
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load_all(&self) -> StoreResult<Vec<LedgerEntry>> {
        if self.needs_header()? {
            return Err(self.missing_table());
        }

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_path(&self.path)?;

        let header = reader.headers()?.clone();
        let map = HeaderMap::from_header(header.iter())?;

        let mut entries = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            let cells = map.select(|i| record.get(i));
            entries.push(entry_from_cells(index + 1, &cells)?);
        }

        debug!("Read {} ledger rows", entries.len());
        Ok(entries)
    }
}
