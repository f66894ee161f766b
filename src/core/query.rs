//! Query Engine - filtered views and monthly totals over the full ledger.
//!
//! Queries always run over every entry read from the store; there is no incremental state.
//! Rows whose purchase date cannot be read never match a date range and never reach the
//! monthly aggregate, but they are counted so the caller can report them.

use crate::{
    errors::{Error, Result},
    models::{EntryStatus, LedgerEntry},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Criteria for a filtered view. Empty sets and `None` mean "no restriction".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    /// First purchase date included
    pub date_from: NaiveDate,
    /// Last purchase date included
    pub date_to: NaiveDate,
    /// Areas to keep
    pub areas: BTreeSet<String>,
    /// Congregations to keep
    pub congregations: BTreeSet<String>,
    /// People to keep
    pub people: BTreeSet<String>,
    /// Only entries with this payment status
    pub status: Option<EntryStatus>,
    /// Case-insensitive substring of the product name
    pub product_contains: Option<String>,
}

impl QueryFilter {
    /// A filter restricted only to the inclusive date range.
    #[must_use]
    pub const fn new(date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self {
            date_from,
            date_to,
            areas: BTreeSet::new(),
            congregations: BTreeSet::new(),
            people: BTreeSet::new(),
            status: None,
            product_contains: None,
        }
    }

    /// Keeps entries in these areas.
    #[must_use]
    pub fn with_areas<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.areas = areas.into_iter().map(Into::into).collect();
        self
    }

    /// Keeps entries in these congregations.
    #[must_use]
    pub fn with_congregations<I, S>(mut self, congregations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.congregations = congregations.into_iter().map(Into::into).collect();
        self
    }

    /// Keeps entries recorded for these people.
    #[must_use]
    pub fn with_people<I, S>(mut self, people: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.people = people.into_iter().map(Into::into).collect();
        self
    }

    /// Keeps entries with this status; `None` keeps both.
    #[must_use]
    pub const fn with_status(mut self, status: Option<EntryStatus>) -> Self {
        self.status = status;
        self
    }

    /// Blank text leaves the product unrestricted.
    #[must_use]
    pub fn with_product_containing(mut self, text: Option<&str>) -> Self {
        self.product_contains = text
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase);
        self
    }

    /// Whether `entry` passes every criterion.
    #[must_use]
    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        let Some(date) = entry.purchase_date.date() else {
            return false;
        };

        (self.date_from..=self.date_to).contains(&date)
            && in_set(&self.areas, &entry.area)
            && in_set(&self.congregations, &entry.congregation)
            && in_set(&self.people, &entry.person)
            && self.status.is_none_or(|status| entry.status == status)
            && self
                .product_contains
                .as_deref()
                .is_none_or(|needle| entry.product.to_lowercase().contains(needle))
    }
}

fn in_set(set: &BTreeSet<String>, value: &str) -> bool {
    set.is_empty() || set.contains(value)
}

/// Sum of `total` for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyTotal {
    /// Calendar year
    pub year: i32,
    /// 1 to 12
    pub month: u32,
    /// Sum of `total` over the month's entries
    pub total: Decimal,
}

/// Result of [`query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredView {
    /// Matching entries, in ledger order
    pub entries: Vec<LedgerEntry>,
    /// Sum of `total` over `entries`
    pub total: Decimal,
    /// Per-month totals over the whole ledger, independent of the filter
    pub monthly: Vec<MonthlyTotal>,
    /// Number of ledger rows examined
    pub rows_scanned: usize,
    /// Rows whose purchase date could not be read
    pub unreadable_dates: usize,
}

/// Adds `entry.total` to `sum`, naming the ledger row if the result does not fit.
fn add_total(sum: Decimal, entry: &LedgerEntry, row: usize) -> Result<Decimal> {
    sum.checked_add(entry.total)
        .ok_or_else(|| Error::AmountOverflow {
            what: format!("sum of totals at ledger row {row}"),
        })
}

/// Groups every entry by `(year, month)` of its purchase date and sums `total`.
///
/// Entries with an unreadable date are left out. The result is ascending by year, then month.
///
/// # Errors
/// Returns [`Error::AmountOverflow`] if a month's sum does not fit in a decimal.
pub fn monthly_totals(entries: &[LedgerEntry]) -> Result<Vec<MonthlyTotal>> {
    let mut groups: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
    for (index, entry) in entries.iter().enumerate() {
        if let Some(key) = entry.year_month() {
            let sum = groups.entry(key).or_insert(Decimal::ZERO);
            *sum = add_total(*sum, entry, index + 1)?;
        }
    }

    Ok(groups
        .into_iter()
        .map(|((year, month), total)| MonthlyTotal { year, month, total })
        .collect())
}

/// Filters the ledger and computes the filtered sum and the monthly aggregate.
///
/// # Errors
/// Returns [`Error::AmountOverflow`] if the filtered sum or a monthly sum does not fit.
pub fn query(entries: &[LedgerEntry], filter: &QueryFilter) -> Result<FilteredView> {
    let unreadable_dates = entries
        .iter()
        .filter(|entry| entry.purchase_date.date().is_none())
        .count();
    if unreadable_dates > 0 {
        warn!(
            "{} ledger rows have an unreadable purchase date and were skipped",
            unreadable_dates
        );
    }

    let mut matching = Vec::new();
    let mut total = Decimal::ZERO;
    for (index, entry) in entries.iter().enumerate() {
        if filter.matches(entry) {
            total = add_total(total, entry, index + 1)?;
            matching.push(entry.clone());
        }
    }

    debug!(
        "Query matched {} of {} rows, total {}",
        matching.len(),
        entries.len(),
        total
    );

    Ok(FilteredView {
        entries: matching,
        total,
        monthly: monthly_totals(entries)?,
        rows_scanned: entries.len(),
        unreadable_dates,
    })
}

/// Sorted distinct non-blank values of one field, for building filter choices.
#[must_use]
pub fn distinct_values<F>(entries: &[LedgerEntry], field: F) -> Vec<String>
where
    F: Fn(&LedgerEntry) -> &str,
{
    entries
        .iter()
        .map(|entry| field(entry).trim())
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
