//! Entry Builder - turns operator input into a validated ledger entry.
//!
//! Building is a pure function of the reference data, the operator and the draft. It never
//! touches a store: the caller decides whether and where to append the result.
//!
//! Two variants are chosen by the item selection:
//! - a sale looks its unit price up in the price list by `(product, kind)`;
//! - an expense takes a fixed expense kind and an amount typed by the operator, with
//!   quantity fixed at 1.
//!
//! Both derive `role` from the roster, compute `total = unit_price * quantity`, stamp
//! `recorded_by` from the operator and keep `payment_date` only for paid entries.

use crate::{
    core::{
        auth::Operator,
        price::{parse_price, round_money},
    },
    errors::{Error, Result},
    models::{EXPENSE_PRODUCT, EntryStatus, ExpenseKind, LedgerEntry, RecordDate, ReferenceData},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

/// What is being recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSelection {
    /// A product from the price list
    Sale {
        /// Product name
        product: String,
        /// Chosen variant; required
        kind: Option<String>,
        /// Units sold, at least 1
        quantity: u32,
    },
    /// An expense with an amount typed by the operator
    Expense {
        /// Chosen expense category; required
        kind: Option<ExpenseKind>,
        /// Amount spent, greater than zero
        amount: Decimal,
    },
}

/// Everything an operator fills in on the entry form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    /// Day the sale or expense happened
    pub purchase_date: NaiveDate,
    /// Must be an area in the hierarchy
    pub area: String,
    /// Must belong to `area`
    pub congregation: String,
    /// Must be on the roster
    pub person: String,
    /// Sale or expense details
    pub item: ItemSelection,
    /// Paid or pending
    pub status: EntryStatus,
    /// Required when `status` is `Paid`; dropped otherwise
    pub payment_date: Option<NaiveDate>,
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::IncompleteSelection { field })
    } else {
        Ok(trimmed)
    }
}

fn unknown(field: &'static str, value: &str) -> Error {
    Error::UnknownSelection {
        field,
        value: value.to_string(),
    }
}

/// Resolves `(product, kind, unit_price, quantity)` for the selected item.
fn resolve_item(
    reference: &ReferenceData,
    item: &ItemSelection,
) -> Result<(String, String, Decimal, u32)> {
    match item {
        ItemSelection::Sale {
            product,
            kind,
            quantity,
        } => {
            let product = required("product", product)?;
            if product == EXPENSE_PRODUCT || !reference.price_list.contains_item(product) {
                return Err(unknown("product", product));
            }

            let kinds = reference.price_list.kinds_for(product);
            if kinds.is_empty() {
                return Err(Error::IncompleteSelection { field: "kind" });
            }
            let kind = required("kind", kind.as_deref().unwrap_or_default())?;
            if !kinds.contains(&kind) {
                return Err(unknown("kind", kind));
            }

            if *quantity == 0 {
                return Err(Error::InvalidQuantity {
                    quantity: *quantity,
                });
            }

            let raw_price = reference
                .price_list
                .price_of(product, kind)
                .ok_or_else(|| unknown("kind", kind))?;
            let unit_price = round_money(parse_price(raw_price)?);

            Ok((product.to_string(), kind.to_string(), unit_price, *quantity))
        }
        ItemSelection::Expense { kind, amount } => {
            let kind = kind.ok_or(Error::IncompleteSelection { field: "kind" })?;
            if *amount <= Decimal::ZERO {
                return Err(Error::InvalidAmount { amount: *amount });
            }
            let unit_price = round_money(*amount);
            if unit_price <= Decimal::ZERO {
                return Err(Error::InvalidAmount { amount: *amount });
            }

            Ok((EXPENSE_PRODUCT.to_string(), kind.to_string(), unit_price, 1))
        }
    }
}

/// Validates a draft against the reference data and builds the entry.
///
/// # Errors
/// - [`Error::IncompleteSelection`] when a required choice is blank, the product has no
///   kinds, or a paid entry has no payment date
/// - [`Error::UnknownSelection`] when a choice is not in the reference data
/// - [`Error::InvalidAmount`] for an expense amount that is not positive
/// - [`Error::InvalidQuantity`] for a sale quantity of zero
/// - [`Error::PriceFormat`] when the price-list cell cannot be read
/// - [`Error::AmountOverflow`] when `unit_price * quantity` does not fit in a decimal
pub fn build_entry(
    reference: &ReferenceData,
    operator: &Operator,
    draft: &EntryDraft,
) -> Result<LedgerEntry> {
    let area = required("area", &draft.area)?;
    if !reference.areas.contains_area(area) {
        return Err(unknown("area", area));
    }

    let congregation = required("congregation", &draft.congregation)?;
    if !reference.areas.contains(area, congregation) {
        return Err(unknown("congregation", congregation));
    }

    let person = required("person", &draft.person)?;
    let role = reference
        .roster
        .role_of(person)
        .ok_or_else(|| unknown("person", person))?;

    let (product, kind, unit_price, quantity) = resolve_item(reference, &draft.item)?;

    let payment_date = match draft.status {
        EntryStatus::Paid => Some(RecordDate::Valid(
            draft
                .payment_date
                .ok_or(Error::IncompleteSelection {
                    field: "payment_date",
                })?,
        )),
        EntryStatus::Pending => {
            if draft.payment_date.is_some() {
                debug!("Dropping payment date from a pending entry");
            }
            None
        }
    };

    let total = unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(|| Error::AmountOverflow {
            what: format!("{quantity} x {unit_price}"),
        })?;

    let entry = LedgerEntry {
        purchase_date: RecordDate::Valid(draft.purchase_date),
        area: area.to_string(),
        congregation: congregation.to_string(),
        person: person.to_string(),
        role: role.to_string(),
        product,
        kind,
        unit_price,
        quantity,
        total,
        status: draft.status,
        payment_date,
        recorded_by: operator.identity().to_string(),
    };

    debug!(
        "Built {} entry for {}: {} x {} = {}",
        entry.product, entry.person, entry.quantity, entry.unit_price, entry.total
    );
    Ok(entry)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        models::{PriceList, PriceRow},
        test_utils::{expense_draft, sale_draft, sample_operator, sample_reference},
    };

    fn build(draft: &EntryDraft) -> Result<LedgerEntry> {
        build_entry(&sample_reference(), &sample_operator(), draft)
    }

    #[test]
    fn test_sale_price_comes_from_price_list() {
        let entry = build(&sale_draft("Bible", Some("Large"), 2)).unwrap();

        assert_eq!(entry.unit_price, Decimal::new(4500, 2));
        assert_eq!(entry.total, Decimal::new(9000, 2));
        assert_eq!(entry.quantity, 2);
        assert_eq!(entry.product, "Bible");
        assert_eq!(entry.kind, "Large");
    }

    #[test]
    fn test_role_and_operator_are_stamped() {
        let entry = build(&sale_draft("Hymnal", Some("Standard"), 1)).unwrap();
        assert_eq!(entry.role, "Pioneer");
        assert_eq!(entry.recorded_by, "Operator One");
        assert_eq!(entry.unit_price, Decimal::new(2590, 2));
    }

    #[test]
    fn test_product_without_kinds_is_incomplete() {
        let result = build(&sale_draft("Calendar", Some(""), 1));
        assert!(matches!(
            result,
            Err(Error::IncompleteSelection { field: "kind" })
        ));
    }

    #[test]
    fn test_sale_requires_a_kind() {
        assert!(matches!(
            build(&sale_draft("Bible", None, 1)),
            Err(Error::IncompleteSelection { field: "kind" })
        ));
        assert!(matches!(
            build(&sale_draft("Bible", Some("Pocket"), 1)),
            Err(Error::UnknownSelection { field: "kind", .. })
        ));
    }

    #[test]
    fn test_sale_quantity_must_be_positive() {
        assert!(matches!(
            build(&sale_draft("Bible", Some("Large"), 0)),
            Err(Error::InvalidQuantity { quantity: 0 })
        ));
    }

    #[test]
    fn test_unparseable_price_is_price_format_error() {
        assert!(matches!(
            build(&sale_draft("Tract", Some("Pack"), 1)),
            Err(Error::PriceFormat { raw }) if raw == "a combinar"
        ));
    }

    #[test]
    fn test_unknown_product_is_rejected() {
        for product in ["Magazine", EXPENSE_PRODUCT] {
            assert!(matches!(
                build(&sale_draft(product, Some("Large"), 1)),
                Err(Error::UnknownSelection { field: "product", .. })
            ));
        }
    }

    #[test]
    fn test_expense_amount_must_be_positive() {
        let zero = build(&expense_draft(Some(ExpenseKind::Transporte), Decimal::ZERO));
        assert!(matches!(zero, Err(Error::InvalidAmount { .. })));

        let negative = build(&expense_draft(
            Some(ExpenseKind::Transporte),
            Decimal::new(-500, 2),
        ));
        assert!(matches!(negative, Err(Error::InvalidAmount { .. })));
    }

    #[test]
    fn test_expense_entry() {
        let entry = build(&expense_draft(
            Some(ExpenseKind::Transporte),
            Decimal::new(2550, 2),
        ))
        .unwrap();

        assert_eq!(entry.product, EXPENSE_PRODUCT);
        assert_eq!(entry.kind, "Transporte");
        assert_eq!(entry.quantity, 1);
        assert_eq!(entry.unit_price, Decimal::new(2550, 2));
        assert_eq!(entry.total, Decimal::new(2550, 2));
        assert!(entry.is_expense());
    }

    #[test]
    fn test_expense_requires_a_kind() {
        assert!(matches!(
            build(&expense_draft(None, Decimal::ONE)),
            Err(Error::IncompleteSelection { field: "kind" })
        ));
    }

    #[test]
    fn test_payment_date_follows_status() {
        let mut draft = sale_draft("Bible", Some("Small"), 1);
        draft.status = EntryStatus::Pending;
        let pending = build(&draft).unwrap();
        assert!(pending.payment_date.is_none());

        draft.status = EntryStatus::Paid;
        draft.payment_date = None;
        assert!(matches!(
            build(&draft),
            Err(Error::IncompleteSelection {
                field: "payment_date"
            })
        ));

        let paid_on = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        draft.payment_date = Some(paid_on);
        let paid = build(&draft).unwrap();
        assert_eq!(paid.payment_date, Some(RecordDate::Valid(paid_on)));
    }

    #[test]
    fn test_reference_membership_is_checked() {
        let mut draft = sale_draft("Bible", Some("Large"), 1);
        draft.congregation = "Harbor".to_string();
        assert!(matches!(
            build(&draft),
            Err(Error::UnknownSelection {
                field: "congregation",
                ..
            })
        ));

        let mut draft = sale_draft("Bible", Some("Large"), 1);
        draft.area = "West".to_string();
        assert!(matches!(
            build(&draft),
            Err(Error::UnknownSelection { field: "area", .. })
        ));

        let mut draft = sale_draft("Bible", Some("Large"), 1);
        draft.person = "Carla".to_string();
        assert!(matches!(
            build(&draft),
            Err(Error::UnknownSelection { field: "person", .. })
        ));

        let mut draft = sale_draft("Bible", Some("Large"), 1);
        draft.person = "  ".to_string();
        assert!(matches!(
            build(&draft),
            Err(Error::IncompleteSelection { field: "person" })
        ));
    }

    #[test]
    fn test_built_entries_keep_invariants() {
        let drafts = [
            sale_draft("Bible", Some("Large"), 3),
            sale_draft("Hymnal", Some("Standard"), 7),
            expense_draft(Some(ExpenseKind::Hospedagem), Decimal::new(12_345, 3)),
        ];
        for draft in &drafts {
            let entry = build(draft).unwrap();
            assert_eq!(entry.total, entry.unit_price * Decimal::from(entry.quantity));
            assert_eq!(
                entry.status == EntryStatus::Paid,
                entry.payment_date.is_some()
            );
        }
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let mut reference = sample_reference();
        reference.price_list = PriceList::new(vec![PriceRow {
            item: "Bible".to_string(),
            kind: "Large".to_string(),
            unit_price: Decimal::MAX.to_string(),
        }]);
        let build = |quantity| {
            build_entry(
                &reference,
                &sample_operator(),
                &sale_draft("Bible", Some("Large"), quantity),
            )
        };

        assert_eq!(build(1).unwrap().total, Decimal::MAX);
        assert!(matches!(build(2), Err(Error::AmountOverflow { .. })));
    }
}
