//! Unified error types for the ledger.
//!
//! `Error` is what every operation surfaces to the operator. Ledger transports report
//! through the narrower `StoreError`, which converts into `Error::Store`.

use rust_decimal::Decimal;
use thiserror::Error;

/// Failures raised by a ledger backend while appending or reading rows.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing table (file or SQL table) has not been created yet.
    #[error("Ledger table '{table}' does not exist yet")]
    TableMissing {
        /// Name or path of the missing table
        table: String,
    },

    /// The header row lacks one of the canonical ledger columns.
    #[error("Ledger header is missing the '{column}' column")]
    MissingColumn {
        /// Canonical column name that was not found
        column: String,
    },

    /// A stored cell could not be read back into its field type.
    #[error("Ledger row {row}: cannot read '{value}' as {column}")]
    MalformedRow {
        /// 1-based data row number (header excluded)
        row: usize,
        /// Canonical column name of the bad cell
        column: &'static str,
        /// Raw cell contents
        value: String,
    },

    /// The backend could not be reached or is otherwise unusable.
    #[error("Ledger store unavailable: {message}")]
    Unavailable {
        /// Description of the failure
        message: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// True when the failure only means "nothing has been recorded yet".
    #[must_use]
    pub const fn is_missing_table(&self) -> bool {
        matches!(self, Self::TableMissing { .. })
    }
}

/// Main application error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Reference tables could not be loaded; the session cannot start.
    #[error("Reference data unavailable: {message}")]
    ReferenceUnavailable {
        /// What went wrong while loading the reference source
        message: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A required choice was left empty, or has no valid options.
    #[error("Incomplete selection: '{field}' must be chosen")]
    IncompleteSelection {
        /// Form field that is missing
        field: &'static str,
    },

    /// A choice does not exist in the reference data.
    #[error("Unknown {field}: '{value}'")]
    UnknownSelection {
        /// Form field holding the value
        field: &'static str,
        /// The rejected value
        value: String,
    },

    #[error("Invalid amount: {amount} (must be greater than zero)")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    #[error("Invalid quantity: {quantity} (must be at least 1)")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: u32,
    },

    /// A total would not fit in a decimal.
    #[error("Amount too large: {what}")]
    AmountOverflow {
        /// Which sum or product overflowed
        what: String,
    },

    /// A price-list cell is not a recognisable money value.
    #[error("Cannot read price '{raw}'")]
    PriceFormat {
        /// Raw price text from the price list
        raw: String,
    },

    #[error("Authentication failed for '{username}'")]
    AuthFailure {
        /// Username that was rejected
        username: String,
    },

    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
