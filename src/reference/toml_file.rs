//! Reference tables kept in a single TOML document.
//!
//! ```toml
//! [[price_list]]
//! item = "Bible"
//! type = "Large"
//! unit_price = "R$ 45,00"
//!
//! [[roster]]
//! name = "Ana"
//! role = "Pioneer"
//!
//! [[areas]]
//! area = "North"
//! congregation = "Central"
//! ```

use super::{ReferenceSource, unavailable};
use crate::{
    errors::Result,
    models::{AreaHierarchy, AreaRow, PriceList, PriceRow, ReferenceData, Roster, RosterRow},
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ReferenceFile {
    price_list: Vec<PriceRow>,
    roster: Vec<RosterRow>,
    areas: Vec<AreaRow>,
}

/// Parses reference tables from TOML text.
///
/// # Errors
/// Returns `ReferenceUnavailable` if the text is malformed or a table is missing.
pub fn parse_reference(contents: &str) -> Result<ReferenceData> {
    let file: ReferenceFile =
        toml::from_str(contents).map_err(|e| unavailable(format!("invalid reference file: {e}")))?;

    Ok(ReferenceData {
        price_list: PriceList::new(file.price_list),
        roster: Roster::new(file.roster),
        areas: AreaHierarchy::new(file.areas),
    })
}

/// Reads the reference tables from a TOML file.
#[derive(Debug, Clone)]
pub struct TomlReferenceSource {
    path: PathBuf,
}

impl TomlReferenceSource {
    /// Reads all three tables from the file at `path`.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ReferenceSource for TomlReferenceSource {
    fn load(&self) -> Result<ReferenceData> {
        debug!("Reading reference tables from {:?}", self.path);
        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| unavailable(format!("cannot read {}: {e}", self.path.display())))?;
        parse_reference(&contents)
    }
}
