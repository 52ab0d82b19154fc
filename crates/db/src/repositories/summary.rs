//! Year summary repository. Summaries are append-only.

use chrono::{DateTime, Utc};
use serde_json::json;
use taxbook_core::tax::TaxStats;
use taxbook_core::year::{ClosureStats, YearSummary};
use taxbook_shared::types::{OwnerId, SummaryId};

use super::RepositoryError;
use crate::store::{Filter, OrderBy, SharedStore, collections};

/// Read and append access to `yearSummaries`.
#[derive(Clone)]
pub struct SummaryRepository {
    store: SharedStore,
}

impl SummaryRepository {
    /// Creates a new summary repository.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Stores a new summary and returns it with its assigned id.
    pub async fn append(
        &self,
        owner_id: &OwnerId,
        year: i32,
        closed_at: DateTime<Utc>,
        final_stats: ClosureStats,
        tax_stats: TaxStats,
    ) -> Result<YearSummary, RepositoryError> {
        let data = json!({
            "ownerId": owner_id,
            "year": year,
            "closedAt": closed_at,
            "finalStats": final_stats,
            "taxStats": tax_stats,
        });
        let id = self
            .store
            .add_document(collections::YEAR_SUMMARIES, data)
            .await?;

        Ok(YearSummary {
            id: SummaryId::new(id),
            owner_id: owner_id.clone(),
            year,
            closed_at,
            final_stats,
            tax_stats,
        })
    }

    /// All summaries of the owner, most recently closed year first.
    pub async fn list_for_owner(
        &self,
        owner_id: &OwnerId,
    ) -> Result<Vec<YearSummary>, RepositoryError> {
        let docs = self
            .store
            .query_documents(
                collections::YEAR_SUMMARIES,
                &[Filter::eq("ownerId", owner_id.as_str())],
                Some(&OrderBy::desc("year")),
            )
            .await?;
        docs.iter()
            .map(|doc| doc.decode().map_err(RepositoryError::from))
            .collect()
    }

    /// Latest summary written for `year`, if the year was ever closed.
    ///
    /// A year closed, unlocked and closed again has several summaries.
    pub async fn find_for_year(
        &self,
        owner_id: &OwnerId,
        year: i32,
    ) -> Result<Option<YearSummary>, RepositoryError> {
        let docs = self
            .store
            .query_documents(
                collections::YEAR_SUMMARIES,
                &[Filter::eq("ownerId", owner_id.as_str()), Filter::eq("year", year)],
                Some(&OrderBy::desc("closedAt")),
            )
            .await?;
        Ok(docs.first().map(|doc| doc.decode()).transpose()?)
    }
}
