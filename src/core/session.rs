//! An authenticated working session.
//!
//! A session owns the operator, the reference data loaded when it started, and the ledger
//! store it was handed. Nothing here is global: every dependency is passed in, and the
//! reference data stays untouched until the session is dropped.

use crate::{
    core::{
        auth::{Authenticator, Operator},
        builder::{EntryDraft, build_entry},
        query::{FilteredView, QueryFilter, query},
        receipt::{ReceiptFields, format_receipt},
    },
    errors::{Error, Result},
    models::{LedgerEntry, ReferenceData},
    reference::{ReferenceSource, load_reference_data},
    store::{LedgerStore, load_or_empty},
};
use tracing::{info, instrument};

/// Operator, reference data and ledger store for one sitting.
#[derive(Debug)]
pub struct Session<S> {
    operator: Operator,
    reference: ReferenceData,
    store: S,
}

impl<S: LedgerStore> Session<S> {
    /// Loads the reference data and opens a session for `operator`.
    ///
    /// # Errors
    /// Returns [`Error::ReferenceUnavailable`] if the reference tables cannot be loaded;
    /// no session exists in that case.
    pub fn start<R: ReferenceSource>(operator: Operator, source: &R, store: S) -> Result<Self> {
        let reference = load_reference_data(source)?;
        info!("Session started for {}", operator.identity());
        Ok(Self {
            operator,
            reference,
            store,
        })
    }

    /// Authenticates first, then starts the session.
    ///
    /// # Errors
    /// Returns [`Error::AuthFailure`] for rejected credentials, otherwise as [`Session::start`].
    pub fn login<A, R>(
        authenticator: &A,
        username: &str,
        password: &str,
        source: &R,
        store: S,
    ) -> Result<Self>
    where
        A: Authenticator,
        R: ReferenceSource,
    {
        let operator = authenticator.authenticate(username, password)?;
        Self::start(operator, source, store)
    }

    /// Who is recording.
    #[must_use]
    pub const fn operator(&self) -> &Operator {
        &self.operator
    }

    /// Reference data loaded at session start.
    #[must_use]
    pub const fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Ledger store entries are appended to.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Builds an entry from `draft` and appends it to the ledger.
    ///
    /// Nothing is written when validation fails.
    ///
    /// # Errors
    /// Any validation error from [`build_entry`], or a store failure on append.
    #[instrument(skip(self, draft), fields(operator = %self.operator.identity()))]
    pub async fn record(&self, draft: &EntryDraft) -> Result<LedgerEntry> {
        let entry = build_entry(&self.reference, &self.operator, draft)?;
        self.store.append(&entry).await?;

        info!(
            "Recorded {} / {} for {} ({})",
            entry.product, entry.kind, entry.person, entry.total
        );
        Ok(entry)
    }

    /// Every ledger entry in append order; an untouched ledger reads as empty.
    ///
    /// # Errors
    /// Any store failure other than a missing table.
    pub async fn entries(&self) -> Result<Vec<LedgerEntry>> {
        Ok(load_or_empty(&self.store).await?)
    }

    /// Re-reads the whole ledger and runs `filter` over it.
    ///
    /// # Errors
    /// Returns a store error if the ledger cannot be read, or [`Error::AmountOverflow`]
    /// when a sum does not fit.
    #[instrument(skip(self, filter))]
    pub async fn run_query(&self, filter: &QueryFilter) -> Result<FilteredView> {
        let entries = self.entries().await?;
        query(&entries, filter)
    }

    /// Receipt text for the ledger row at 1-based position `row`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownSelection`] when no such row exists, or a store error.
    pub async fn receipt_for_row(&self, row: usize) -> Result<String> {
        let entries = self.entries().await?;
        let entry = row
            .checked_sub(1)
            .and_then(|index| entries.get(index))
            .ok_or_else(|| Error::UnknownSelection {
                field: "row",
                value: row.to_string(),
            })?;
        Ok(format_receipt(&ReceiptFields::from_entry(entry)))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        config::OperatorAccount,
        core::auth::{ConfiguredAuthenticator, hash_password},
        models::ExpenseKind,
        store::MemoryLedgerStore,
        test_utils::{
            StaticReferenceSource, expense_draft, sale_draft, sample_operator, sample_reference,
        },
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn start() -> Session<MemoryLedgerStore> {
        Session::start(
            sample_operator(),
            &StaticReferenceSource(sample_reference()),
            MemoryLedgerStore::new(),
        )
        .unwrap()
    }

    fn whole_year() -> QueryFilter {
        QueryFilter::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_record_appends_built_entry() -> Result<()> {
        let session = start();
        let entry = session.record(&sale_draft("Bible", Some("Large"), 2)).await?;

        assert_eq!(session.entries().await?, vec![entry.clone()]);
        assert_eq!(entry.recorded_by, session.operator().identity());
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_draft_is_not_persisted() -> Result<()> {
        let session = start();
        let result = session.record(&sale_draft("Bible", Some("Large"), 0)).await;

        assert!(matches!(result, Err(Error::InvalidQuantity { .. })));
        assert!(session.entries().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_query_sees_new_entries() -> Result<()> {
        let session = start();
        assert!(session.run_query(&whole_year()).await?.entries.is_empty());

        session.record(&sale_draft("Bible", Some("Large"), 2)).await?;
        session
            .record(&expense_draft(
                Some(ExpenseKind::Material),
                Decimal::new(1000, 2),
            ))
            .await?;

        let view = session.run_query(&whole_year()).await?;
        assert_eq!(view.entries.len(), 2);
        assert_eq!(view.total, Decimal::new(10_000, 2));
        Ok(())
    }

    #[tokio::test]
    async fn test_receipt_for_row() -> Result<()> {
        let session = start();
        session.record(&sale_draft("Bible", Some("Large"), 2)).await?;

        let receipt = session.receipt_for_row(1).await?;
        assert!(receipt.contains("total: 90.00\n"));

        for row in [0, 2] {
            assert!(matches!(
                session.receipt_for_row(row).await,
                Err(Error::UnknownSelection { field: "row", .. })
            ));
        }
        Ok(())
    }

    #[test]
    fn test_login_requires_valid_credentials() {
        let auth = ConfiguredAuthenticator::new(vec![OperatorAccount {
            username: "ana".to_string(),
            password_sha256: hash_password("s3cret"),
            display_name: None,
        }]);
        let source = StaticReferenceSource(sample_reference());

        let rejected = Session::login(&auth, "ana", "nope", &source, MemoryLedgerStore::new());
        assert!(matches!(rejected, Err(Error::AuthFailure { .. })));

        let session =
            Session::login(&auth, "ana", "s3cret", &source, MemoryLedgerStore::new()).unwrap();
        assert_eq!(session.operator().identity(), "ana");
        assert_eq!(session.reference(), &sample_reference());
    }

    #[test]
    fn test_start_fails_without_reference_data() {
        let result = Session::start(
            sample_operator(),
            &StaticReferenceSource(ReferenceData::default()),
            MemoryLedgerStore::new(),
        );
        assert!(matches!(result, Err(Error::ReferenceUnavailable { .. })));
    }
}
