//! Shared test utilities for the ledger.
//!
//! Fixtures here describe one small, consistent world: two areas, two people, a handful
//! of priced products, and entries recorded in January 2024 by "Operator One".

use crate::{
    core::{
        auth::Operator,
        builder::{EntryDraft, ItemSelection},
    },
    errors::Result,
    models::{
        AreaHierarchy, AreaRow, EntryStatus, ExpenseKind, LedgerEntry, PriceList, PriceRow,
        RecordDate, ReferenceData, Roster, RosterRow,
    },
    reference::ReferenceSource,
    store::SqlLedgerStore,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn price(item: &str, kind: &str, unit_price: &str) -> PriceRow {
    PriceRow {
        item: item.to_string(),
        kind: kind.to_string(),
        unit_price: unit_price.to_string(),
    }
}

/// Reference tables used across tests.
///
/// # Contents
/// * Bible: Large `R$ 45,00`, Small `R$ 30,00`
/// * Hymnal: Standard `R$ 25,90`
/// * Tract: Pack with an unreadable price
/// * Calendar: a single row with no kind
/// * Ana (Pioneer) and Bruno (Publisher)
/// * North: Central, Riverside; South: Harbor
#[must_use]
pub fn sample_reference() -> ReferenceData {
    ReferenceData {
        price_list: PriceList::new(vec![
            price("Bible", "Large", "R$ 45,00"),
            price("Bible", "Small", "R$ 30,00"),
            price("Hymnal", "Standard", "R$ 25,90"),
            price("Tract", "Pack", "a combinar"),
            price("Calendar", "", "R$ 10,00"),
        ]),
        roster: Roster::new(vec![
            RosterRow {
                name: "Ana".to_string(),
                role: "Pioneer".to_string(),
            },
            RosterRow {
                name: "Bruno".to_string(),
                role: "Publisher".to_string(),
            },
        ]),
        areas: AreaHierarchy::new(vec![
            AreaRow {
                area: "North".to_string(),
                congregation: "Central".to_string(),
            },
            AreaRow {
                area: "North".to_string(),
                congregation: "Riverside".to_string(),
            },
            AreaRow {
                area: "South".to_string(),
                congregation: "Harbor".to_string(),
            },
        ]),
    }
}

#[must_use]
pub fn sample_operator() -> Operator {
    Operator::new("Operator One")
}

/// Reference source that hands out fixed data.
pub struct StaticReferenceSource(pub ReferenceData);

impl ReferenceSource for StaticReferenceSource {
    fn load(&self) -> Result<ReferenceData> {
        Ok(self.0.clone())
    }
}

/// A paid sale draft for Ana in North/Central, bought 15/01/2024 and paid 20/01/2024.
#[must_use]
pub fn sale_draft(product: &str, kind: Option<&str>, quantity: u32) -> EntryDraft {
    EntryDraft {
        purchase_date: day(2024, 1, 15),
        area: "North".to_string(),
        congregation: "Central".to_string(),
        person: "Ana".to_string(),
        item: ItemSelection::Sale {
            product: product.to_string(),
            kind: kind.map(str::to_string),
            quantity,
        },
        status: EntryStatus::Paid,
        payment_date: Some(day(2024, 1, 20)),
    }
}

/// A pending expense draft for Bruno in South/Harbor, dated 15/01/2024.
#[must_use]
pub fn expense_draft(kind: Option<ExpenseKind>, amount: Decimal) -> EntryDraft {
    EntryDraft {
        purchase_date: day(2024, 1, 15),
        area: "South".to_string(),
        congregation: "Harbor".to_string(),
        person: "Bruno".to_string(),
        item: ItemSelection::Expense { kind, amount },
        status: EntryStatus::Pending,
        payment_date: None,
    }
}

/// The entry `sale_draft("Bible", Some("Large"), 2)` builds: 2 x 45.00, paid.
#[must_use]
pub fn sample_sale_entry() -> LedgerEntry {
    LedgerEntry {
        purchase_date: RecordDate::Valid(day(2024, 1, 15)),
        area: "North".to_string(),
        congregation: "Central".to_string(),
        person: "Ana".to_string(),
        role: "Pioneer".to_string(),
        product: "Bible".to_string(),
        kind: "Large".to_string(),
        unit_price: Decimal::new(4500, 2),
        quantity: 2,
        total: Decimal::new(9000, 2),
        status: EntryStatus::Paid,
        payment_date: Some(RecordDate::Valid(day(2024, 1, 20))),
        recorded_by: "Operator One".to_string(),
    }
}

/// A pending transport expense of 25.50 for Bruno, dated 03/02/2024.
#[must_use]
pub fn sample_expense_entry() -> LedgerEntry {
    LedgerEntry {
        purchase_date: RecordDate::Valid(day(2024, 2, 3)),
        area: "South".to_string(),
        congregation: "Harbor".to_string(),
        person: "Bruno".to_string(),
        role: "Publisher".to_string(),
        product: "Expense".to_string(),
        kind: ExpenseKind::Transporte.to_string(),
        unit_price: Decimal::new(2550, 2),
        quantity: 1,
        total: Decimal::new(2550, 2),
        status: EntryStatus::Pending,
        payment_date: None,
        recorded_by: "Operator One".to_string(),
    }
}

/// The sample sale moved to `date`, with a single unit making up `total`.
#[must_use]
pub fn entry_on(date: NaiveDate, total: i64) -> LedgerEntry {
    LedgerEntry {
        purchase_date: RecordDate::Valid(date),
        quantity: 1,
        unit_price: Decimal::from(total),
        total: Decimal::from(total),
        ..sample_sale_entry()
    }
}

/// Creates a SQL ledger store over an in-memory `SQLite` database with no tables.
pub async fn setup_sql_store() -> Result<SqlLedgerStore> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    Ok(SqlLedgerStore::new(db))
}
