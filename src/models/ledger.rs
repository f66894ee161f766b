//! Ledger entry model.
//!
//! A `LedgerEntry` is one recorded sale or expense. Entries are only ever created by the
//! entry builder or read back from a store; nothing updates them afterwards.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::{fmt, str::FromStr};

/// Format used for every persisted date (`day/month/year`).
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Older rows may carry ISO dates; they are accepted on read but never written.
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// The product value that marks an entry as an expense instead of a sale.
pub const EXPENSE_PRODUCT: &str = "Expense";

/// Payment status of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryStatus {
    /// Settled; the entry carries a payment date
    Paid,
    /// Not settled yet; no payment date
    Pending,
}

impl EntryStatus {
    /// Canonical stored text for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Pending => "Pending",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "paid" | "pago" => Ok(Self::Paid),
            "pending" | "pendente" => Ok(Self::Pending),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

/// Fixed set of expense categories an expense entry may use as its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpenseKind {
    /// Travel and fuel
    Transporte,
    /// Meals
    Alimentacao,
    /// Lodging
    Hospedagem,
    /// Supplies and printed material
    Material,
    /// Anything else
    Outros,
}

impl ExpenseKind {
    /// Every expense kind, in the order forms should offer them.
    pub const ALL: [Self; 5] = [
        Self::Transporte,
        Self::Alimentacao,
        Self::Hospedagem,
        Self::Material,
        Self::Outros,
    ];

    /// Stored label for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transporte => "Transporte",
            Self::Alimentacao => "Alimentação",
            Self::Hospedagem => "Hospedagem",
            Self::Material => "Material",
            Self::Outros => "Outros",
        }
    }
}

impl fmt::Display for ExpenseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .or_else(|| {
                // "Alimentacao" typed without the accent
                wanted
                    .eq_ignore_ascii_case("alimentacao")
                    .then_some(Self::Alimentacao)
            })
            .ok_or_else(|| format!("unknown expense kind '{wanted}'"))
    }
}

/// A date cell as stored in the ledger.
///
/// Entries built by this crate always hold `Valid` dates. Rows read back from an external
/// store may contain text that is not a date; that text is kept verbatim so the row can still
/// be listed, while date filtering and monthly grouping skip it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordDate {
    /// A calendar date
    Valid(NaiveDate),
    /// Cell text that could not be read as a date
    Unreadable(String),
}

impl RecordDate {
    /// Reads a stored cell, accepting `day/month/year` and ISO `year-month-day`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT))
            .map_or_else(|_| Self::Unreadable(raw.to_string()), Self::Valid)
    }

    /// The calendar date, if the cell held one.
    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Valid(date) => Some(*date),
            Self::Unreadable(_) => None,
        }
    }
}

impl From<NaiveDate> for RecordDate {
    fn from(date: NaiveDate) -> Self {
        Self::Valid(date)
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            Self::Unreadable(raw) => f.write_str(raw),
        }
    }
}

/// One row of the ledger log.
///
/// Invariants for entries produced by the builder: `total == unit_price * quantity`,
/// `payment_date.is_some() == (status == Paid)`, and `role` is the roster role of `person`
/// captured when the entry was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Date of the sale or expense
    pub purchase_date: RecordDate,
    /// Area from the reference hierarchy
    pub area: String,
    /// Congregation within `area`
    pub congregation: String,
    /// Person from the roster
    pub person: String,
    /// Roster role of `person` at write time
    pub role: String,
    /// Product name, or [`EXPENSE_PRODUCT`]
    pub product: String,
    /// Product variant for sales, expense category for expenses
    pub kind: String,
    /// Price of one unit
    pub unit_price: Decimal,
    /// Units sold; always 1 for expenses
    pub quantity: u32,
    /// `unit_price * quantity`
    pub total: Decimal,
    /// Payment status
    pub status: EntryStatus,
    /// Set only for paid entries
    pub payment_date: Option<RecordDate>,
    /// Identity of the operator who recorded the entry
    pub recorded_by: String,
}

impl LedgerEntry {
    /// Whether this entry records an expense rather than a sale.
    #[must_use]
    pub fn is_expense(&self) -> bool {
        self.product == EXPENSE_PRODUCT
    }

    /// `(year, month)` of the purchase date, or `None` when the stored date is unreadable.
    #[must_use]
    pub fn year_month(&self) -> Option<(i32, u32)> {
        self.purchase_date
            .date()
            .map(|date| (date.year(), date.month()))
    }
}
