//! Year closure workflow: validate, snapshot, archive, advance.
//!
//! Closing a year runs strictly in order:
//!
//! 1. the registry must exist and the year must be the active year,
//! 2. the year is re-validated and any blocking problem aborts the closure,
//! 3. an immutable year summary is appended,
//! 4. every transaction and budget entry of the year is archived in one batch,
//! 5. the registry moves on to the next open year.
//!
//! Unlocking reverses steps 4 and 5 and keeps the summary.

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use taxbook_core::tax::TaxAggregator;
use taxbook_core::year::{
    ClosureEvent, ClosureReport, ClosureState, YearError, YearRegistry, YearSummary,
    evaluate_closure,
};
use taxbook_shared::TaxDefaults;
use taxbook_shared::types::OwnerId;
use tracing::{error, info, warn};

use super::{ProfileRepository, RepositoryError, SummaryRepository, TransactionRepository};
use crate::guard::OperationGuard;
use crate::store::{Filter, SharedStore, WriteOp, collections};

/// Result of a successful closure.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosureOutcome {
    /// Year that became active.
    pub new_active_year: i32,
    /// Snapshot written for the closed year.
    pub summary: YearSummary,
    /// Transactions flipped to archived.
    pub archived_transactions: usize,
    /// Budget entries flipped to archived.
    pub archived_budgets: usize,
}

/// Result of unlocking a closed year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockOutcome {
    /// Year reopened and made active.
    pub year: i32,
    /// Transactions flipped back to editable.
    pub transactions_unarchived: usize,
    /// Budget entries flipped back to editable.
    pub budgets_unarchived: usize,
}

/// Drives year closure and unlock for one store.
#[derive(Clone)]
pub struct ClosureWorkflow {
    store: SharedStore,
    profiles: ProfileRepository,
    transactions: TransactionRepository,
    summaries: SummaryRepository,
    guard: OperationGuard,
    tax_defaults: TaxDefaults,
}

impl ClosureWorkflow {
    /// Creates a workflow sharing `guard` with the other year operations.
    #[must_use]
    pub fn new(store: SharedStore, guard: OperationGuard, tax_defaults: TaxDefaults) -> Self {
        Self {
            profiles: ProfileRepository::new(store.clone()),
            transactions: TransactionRepository::new(store.clone()),
            summaries: SummaryRepository::new(store.clone()),
            store,
            guard,
            tax_defaults,
        }
    }

    /// Checks whether `year` can be closed. Writes nothing.
    pub async fn validate_year_closure(
        &self,
        owner_id: &OwnerId,
        year: i32,
    ) -> Result<ClosureReport, RepositoryError> {
        let transactions = self.transactions.list_for_year(owner_id, year).await?;
        let profile = self.profiles.load(owner_id).await?;
        Ok(evaluate_closure(year, &transactions, profile.as_ref()))
    }

    /// Closes the active year.
    pub async fn close_year(
        &self,
        owner_id: &OwnerId,
        year: i32,
    ) -> Result<ClosureOutcome, RepositoryError> {
        let _permit = self.guard.acquire(owner_id, "closure")?;

        let mut registry = self
            .profiles
            .registry(owner_id)
            .await?
            .ok_or(YearError::RegistryMissing)?;
        registry.ensure_active(year)?;

        let state = ClosureState::of_year(&registry, year).apply(ClosureEvent::Validate)?;
        let report = self.validate_year_closure(owner_id, year).await?;
        if !report.valid {
            state.apply(ClosureEvent::Failed)?;
            warn!(
                owner_id = %owner_id,
                year,
                errors = report.errors.len(),
                "Year closure blocked"
            );
            return Err(YearError::ClosureBlocked {
                year,
                errors: report.errors,
            }
            .into());
        }

        let state = state
            .apply(ClosureEvent::Passed)?
            .apply(ClosureEvent::Close)?;

        match self.commit(owner_id, year, &mut registry, report).await {
            Ok(outcome) => {
                state.apply(ClosureEvent::Committed)?;
                info!(
                    owner_id = %owner_id,
                    year,
                    new_active_year = outcome.new_active_year,
                    transactions = outcome.archived_transactions,
                    budgets = outcome.archived_budgets,
                    "Year closed"
                );
                Ok(outcome)
            }
            Err(err) => {
                state.apply(ClosureEvent::Aborted)?;
                error!(owner_id = %owner_id, year, error = %err, "Year closure failed");
                Err(err)
            }
        }
    }

    async fn commit(
        &self,
        owner_id: &OwnerId,
        year: i32,
        registry: &mut YearRegistry,
        report: ClosureReport,
    ) -> Result<ClosureOutcome, RepositoryError> {
        let transactions = self.transactions.list_for_year(owner_id, year).await?;
        let config = self.profiles.tax_config(owner_id, &self.tax_defaults).await?;
        let tax_stats = TaxAggregator::aggregate(&transactions, &config);

        let closed_at = Utc::now();
        let summary = self
            .summaries
            .append(owner_id, year, closed_at, report.stats, tax_stats)
            .await?;

        let (archived_transactions, archived_budgets) =
            self.set_archived(owner_id, year, true).await?;

        let new_active_year = registry.record_closure(year, closed_at);
        self.profiles.update_registry(owner_id, registry).await?;

        Ok(ClosureOutcome {
            new_active_year,
            summary,
            archived_transactions,
            archived_budgets,
        })
    }

    /// Reopens a closed year and makes it active again.
    ///
    /// The year summary stays in place.
    pub async fn unlock_year(
        &self,
        owner_id: &OwnerId,
        year: i32,
    ) -> Result<UnlockOutcome, RepositoryError> {
        let _permit = self.guard.acquire(owner_id, "unlock")?;

        let mut registry = self
            .profiles
            .registry(owner_id)
            .await?
            .ok_or(YearError::RegistryMissing)?;

        if registry.is_archived(year) {
            ClosureState::of_year(&registry, year).apply(ClosureEvent::Unlock)?;
        } else {
            warn!(owner_id = %owner_id, year, "Unlocking a year that is not archived");
        }

        let (transactions_unarchived, budgets_unarchived) =
            self.set_archived(owner_id, year, false).await?;

        registry.record_unlock(year);
        self.profiles.update_registry(owner_id, &registry).await?;

        info!(
            owner_id = %owner_id,
            year,
            transactions = transactions_unarchived,
            budgets = budgets_unarchived,
            "Year unlocked"
        );
        Ok(UnlockOutcome {
            year,
            transactions_unarchived,
            budgets_unarchived,
        })
    }

    /// Flips `archived` on every transaction and budget entry of `year` in
    /// one batch. Returns the counts per collection.
    async fn set_archived(
        &self,
        owner_id: &OwnerId,
        year: i32,
        archived: bool,
    ) -> Result<(usize, usize), RepositoryError> {
        let filters = [Filter::eq("ownerId", owner_id.as_str()), Filter::eq("year", year)];
        let transactions = self
            .store
            .query_documents(collections::TRANSACTIONS, &filters, None)
            .await?;
        let budgets = self
            .store
            .query_documents(collections::BUDGETS, &filters, None)
            .await?;
        let counts = (transactions.len(), budgets.len());

        let ops: Vec<WriteOp> = transactions
            .into_iter()
            .map(|doc| (collections::TRANSACTIONS, doc))
            .chain(budgets.into_iter().map(|doc| (collections::BUDGETS, doc)))
            .map(|(collection, doc)| {
                WriteOp::update(collection, doc.id, json!({ "archived": archived }))
            })
            .collect();

        if !ops.is_empty() {
            self.store.batch_write(ops).await?;
        }
        Ok(counts)
    }
}
