//! Application settings loaded from `config.toml`.
//!
//! The file selects the ledger backend, the reference source and lists the operator
//! accounts allowed to record entries. A minimal file looks like:
//!
//! ```toml
//! [ledger]
//! backend = "csv"
//! path = "data/ledger.csv"
//!
//! [reference]
//! source = "toml"
//! path = "reference.toml"
//!
//! [[operators]]
//! username = "ana"
//! password_sha256 = "..."
//! ```

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default location of the settings file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Where ledger entries are persisted
    #[serde(default)]
    pub ledger: LedgerSettings,
    /// Where the reference tables are read from
    pub reference: ReferenceSettings,
    /// Accounts that may authenticate
    #[serde(default)]
    pub operators: Vec<OperatorAccount>,
}

/// Ledger backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum LedgerSettings {
    /// SQL table through `SeaORM`; the URL falls back to `DATABASE_URL`
    Sqlite {
        /// Explicit connection URL
        #[serde(default)]
        database_url: Option<String>,
    },
    /// A local CSV file with a header row
    Csv {
        /// Path of the ledger file
        path: PathBuf,
    },
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self::Sqlite { database_url: None }
    }
}

/// Reference source selection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum ReferenceSettings {
    /// One TOML file holding `price_list`, `roster` and `areas` tables
    Toml {
        /// Path of the reference file
        path: PathBuf,
    },
    /// A directory with `price_list.csv`, `roster.csv` and `areas.csv`
    Csv {
        /// Directory holding the three CSV files
        dir: PathBuf,
    },
}

/// One operator allowed to log in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OperatorAccount {
    /// Login name
    pub username: String,
    /// Hex SHA-256 of the password
    pub password_sha256: String,
    /// Name stamped on entries; defaults to `username`
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Loads application settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Loading configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses settings from TOML text.
///
/// # Errors
/// Returns [`Error::Config`] if the text is not a valid settings document.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            [ledger]
            backend = "csv"
            path = "data/ledger.csv"

            [reference]
            source = "csv"
            dir = "reference"

            [[operators]]
            username = "ana"
            password_sha256 = "abc123"
            display_name = "Ana Souza"

            [[operators]]
            username = "bruno"
            password_sha256 = "def456"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.ledger,
            LedgerSettings::Csv {
                path: PathBuf::from("data/ledger.csv")
            }
        );
        assert_eq!(
            config.reference,
            ReferenceSettings::Csv {
                dir: PathBuf::from("reference")
            }
        );
        assert_eq!(config.operators.len(), 2);
        assert_eq!(config.operators[0].display_name.as_deref(), Some("Ana Souza"));
        assert!(config.operators[1].display_name.is_none());
    }

    #[test]
    fn test_ledger_defaults_to_sqlite() {
        let config = parse_config(
            r#"
            [reference]
            source = "toml"
            path = "reference.toml"
            "#,
        )
        .unwrap();

        assert_eq!(config.ledger, LedgerSettings::Sqlite { database_url: None });
        assert!(config.operators.is_empty());
    }

    #[test]
    fn test_missing_reference_section_is_config_error() {
        let result = parse_config("[ledger]\nbackend = \"sqlite\"\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_unreadable_file_is_config_error() {
        let result = load_config("/definitely/not/here/config.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_example_config_parses() {
        let config = parse_config(include_str!("../../config.example.toml")).unwrap();
        assert_eq!(config.ledger, LedgerSettings::Sqlite { database_url: None });
        assert_eq!(config.operators[0].username, "admin");
    }
}
