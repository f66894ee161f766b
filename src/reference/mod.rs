//! Reference Data Provider.
//!
//! Loads the price list, roster and area hierarchy from an external source. The three
//! tables are all-or-nothing: if any one of them cannot be read or is empty, the load fails
//! with [`Error::ReferenceUnavailable`] and the caller must not continue with partial data.
//! Nothing is retried here.

/// Directory of three CSV files
pub mod csv_dir;
/// Single TOML document
pub mod toml_file;

pub use csv_dir::CsvReferenceSource;
pub use toml_file::TomlReferenceSource;

use crate::{
    config::ReferenceSettings,
    errors::{Error, Result},
    models::ReferenceData,
};
use tracing::{error, info};

/// A place the three reference tables can be read from.
pub trait ReferenceSource {
    /// Reads all three tables.
    ///
    /// # Errors
    /// Returns [`Error::ReferenceUnavailable`] if the source is unreachable or malformed.
    fn load(&self) -> Result<ReferenceData>;
}

/// A reference source picked from configuration at runtime.
#[derive(Debug, Clone)]
pub enum AnyReferenceSource {
    /// TOML document source
    Toml(TomlReferenceSource),
    /// CSV directory source
    Csv(CsvReferenceSource),
}

impl From<&ReferenceSettings> for AnyReferenceSource {
    fn from(settings: &ReferenceSettings) -> Self {
        match settings {
            ReferenceSettings::Toml { path } => Self::Toml(TomlReferenceSource::new(path)),
            ReferenceSettings::Csv { dir } => Self::Csv(CsvReferenceSource::new(dir)),
        }
    }
}

impl ReferenceSource for AnyReferenceSource {
    fn load(&self) -> Result<ReferenceData> {
        match self {
            Self::Toml(source) => source.load(),
            Self::Csv(source) => source.load(),
        }
    }
}

pub(crate) fn unavailable(message: impl Into<String>) -> Error {
    Error::ReferenceUnavailable {
        message: message.into(),
    }
}

/// Loads and checks reference data for a new session.
///
/// # Errors
/// Returns [`Error::ReferenceUnavailable`] when the source fails or any table is empty.
pub fn load_reference_data<R: ReferenceSource>(source: &R) -> Result<ReferenceData> {
    let data = source
        .load()
        .inspect_err(|e| error!("Failed to load reference data: {}", e))?;

    let empty_table = [
        ("price list", data.price_list.is_empty()),
        ("roster", data.roster.is_empty()),
        ("area hierarchy", data.areas.is_empty()),
    ]
    .into_iter()
    .find_map(|(name, empty)| empty.then_some(name));

    if let Some(name) = empty_table {
        error!("Reference table '{}' is empty", name);
        return Err(unavailable(format!("the {name} table is empty")));
    }

    info!(
        "Loaded reference data: {} prices, {} people, {} congregations",
        data.price_list.rows().len(),
        data.roster.rows().len(),
        data.areas.rows().len()
    );
    Ok(data)
}
