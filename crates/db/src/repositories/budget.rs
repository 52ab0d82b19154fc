//! Budget repository.

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use taxbook_core::budget::{BudgetEntry, BudgetError, YearMonth};
use taxbook_shared::types::OwnerId;
use tracing::info;

use super::RepositoryError;
use crate::store::{Filter, OrderBy, SharedStore, WriteOp, collections};

/// Monthly budget entries scoped to one owner.
#[derive(Clone)]
pub struct BudgetRepository {
    store: SharedStore,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    async fn find(
        &self,
        owner_id: &OwnerId,
        month: YearMonth,
    ) -> Result<Option<BudgetEntry>, RepositoryError> {
        let doc = self
            .store
            .get_document(collections::BUDGETS, &month.document_id(owner_id))
            .await?;
        Ok(doc.map(|d| d.decode()).transpose()?)
    }

    /// Loads a month, returning an empty entry when nothing is stored.
    pub async fn load(
        &self,
        owner_id: &OwnerId,
        year_month: &str,
    ) -> Result<BudgetEntry, RepositoryError> {
        let month = YearMonth::parse(year_month).map_err(BudgetError::from)?;
        Ok(self
            .find(owner_id, month)
            .await?
            .unwrap_or_else(|| BudgetEntry::empty(owner_id.clone(), month)))
    }

    /// Rejects months outside the active year or already archived.
    async fn check_writable(
        &self,
        owner_id: &OwnerId,
        month: YearMonth,
        active_year: i32,
    ) -> Result<(), RepositoryError> {
        if month.year != active_year {
            return Err(BudgetError::NotActiveYear {
                year_month: month.to_string(),
                active_year,
            }
            .into());
        }
        if self
            .find(owner_id, month)
            .await?
            .is_some_and(|entry| entry.archived)
        {
            return Err(BudgetError::Archived(month.to_string()).into());
        }
        Ok(())
    }

    fn merge_data(owner_id: &OwnerId, month: YearMonth, lines: &BTreeMap<String, Decimal>) -> Value {
        json!({
            "ownerId": owner_id,
            "yearMonth": month.to_string(),
            "year": month.year,
            "archived": false,
            "updatedAt": Utc::now(),
            "lines": lines,
        })
    }

    /// Merges `lines` into the month's entry.
    pub async fn save(
        &self,
        owner_id: &OwnerId,
        year_month: &str,
        lines: &BTreeMap<String, Decimal>,
        active_year: i32,
    ) -> Result<BudgetEntry, RepositoryError> {
        let month = YearMonth::parse(year_month).map_err(BudgetError::from)?;
        BudgetEntry::check_lines(lines)?;
        self.check_writable(owner_id, month, active_year).await?;

        self.store
            .set_document(
                collections::BUDGETS,
                &month.document_id(owner_id),
                Self::merge_data(owner_id, month, lines),
                true,
            )
            .await?;

        info!(owner_id = %owner_id, year_month = %month, lines = lines.len(), "Budget saved");
        self.load(owner_id, year_month).await
    }

    /// Copies the lines of `source` into every target month in one batch.
    pub async fn copy_to_months(
        &self,
        owner_id: &OwnerId,
        source: &str,
        targets: &[String],
        active_year: i32,
    ) -> Result<usize, RepositoryError> {
        let source = self.load(owner_id, source).await?;

        let mut ops = Vec::with_capacity(targets.len());
        for target in targets {
            let month = YearMonth::parse(target).map_err(BudgetError::from)?;
            self.check_writable(owner_id, month, active_year).await?;
            ops.push(WriteOp::set(
                collections::BUDGETS,
                month.document_id(owner_id),
                Self::merge_data(owner_id, month, &source.lines),
                true,
            ));
        }
        let copied = ops.len();
        self.store.batch_write(ops).await?;

        info!(owner_id = %owner_id, source = %source.year_month, copied, "Budget copied");
        Ok(copied)
    }

    /// Every stored month of `year`, in month order.
    pub async fn load_months(
        &self,
        owner_id: &OwnerId,
        year: i32,
    ) -> Result<Vec<BudgetEntry>, RepositoryError> {
        let docs = self
            .store
            .query_documents(
                collections::BUDGETS,
                &[Filter::eq("ownerId", owner_id.as_str()), Filter::eq("year", year)],
                Some(&OrderBy::asc("yearMonth")),
            )
            .await?;
        docs.iter()
            .map(|doc| doc.decode().map_err(RepositoryError::from))
            .collect()
    }
}
