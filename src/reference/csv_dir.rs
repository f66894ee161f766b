//! Reference tables published as CSV files.
//!
//! The directory holds `price_list.csv` (`item,type,unit_price`), `roster.csv`
//! (`name,role`) and `areas.csv` (`area,congregation`), the same shape a spreadsheet
//! "publish as CSV" export produces.

use super::{ReferenceSource, unavailable};
use crate::{
    errors::Result,
    models::{AreaHierarchy, PriceList, ReferenceData, Roster},
};
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File holding the price list.
pub const PRICE_LIST_FILE: &str = "price_list.csv";
/// File holding the roster.
pub const ROSTER_FILE: &str = "roster.csv";
/// File holding the area hierarchy.
pub const AREAS_FILE: &str = "areas.csv";

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| unavailable(format!("cannot open {}: {e}", path.display())))?;

    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(|e| unavailable(format!("malformed {}: {e}", path.display())))
}

/// Reads the reference tables from a directory of CSV files.
#[derive(Debug, Clone)]
pub struct CsvReferenceSource {
    dir: PathBuf,
}

impl CsvReferenceSource {
    /// Reads the three tables from files inside `dir`.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl ReferenceSource for CsvReferenceSource {
    fn load(&self) -> Result<ReferenceData> {
        debug!("Reading reference tables from {:?}", self.dir);
        Ok(ReferenceData {
            price_list: PriceList::new(read_table(&self.dir.join(PRICE_LIST_FILE))?),
            roster: Roster::new(read_table(&self.dir.join(ROSTER_FILE))?),
            areas: AreaHierarchy::new(read_table(&self.dir.join(AREAS_FILE))?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use std::fs;

    fn write_tables(dir: &Path) -> Result<()> {
        fs::write(
            dir.join(PRICE_LIST_FILE),
            "item,type,unit_price\nBible,Large,\"R$ 45,00\"\nBible,Small,30\nHymnal,Standard,25.90\n",
        )?;
        fs::write(dir.join(ROSTER_FILE), "name,role\nAna,Pioneer\nBruno, Publisher\n")?;
        fs::write(
            dir.join(AREAS_FILE),
            "area,congregation\nNorth,Central\nNorth,Riverside\nSouth,Harbor\n",
        )?;
        Ok(())
    }

    #[test]
    fn test_load_all_three_tables() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_tables(dir.path())?;

        let data = CsvReferenceSource::new(dir.path()).load()?;
        assert_eq!(data.price_list.price_of("Bible", "Large"), Some("R$ 45,00"));
        assert_eq!(data.price_list.price_of("Bible", "Small"), Some("30"));
        assert_eq!(data.price_list.price_of("Hymnal", "Standard"), Some("25.9"));
        assert_eq!(data.roster.role_of("Bruno"), Some("Publisher"));
        assert_eq!(data.areas.congregations_in("North"), vec!["Central", "Riverside"]);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_unavailable() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_tables(dir.path())?;
        fs::remove_file(dir.path().join(ROSTER_FILE))?;

        assert!(matches!(
            CsvReferenceSource::new(dir.path()).load(),
            Err(Error::ReferenceUnavailable { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_wrong_columns_are_unavailable() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_tables(dir.path())?;
        fs::write(dir.path().join(AREAS_FILE), "region,group\nNorth,Central\n")?;

        assert!(matches!(
            CsvReferenceSource::new(dir.path()).load(),
            Err(Error::ReferenceUnavailable { .. })
        ));
        Ok(())
    }
}
