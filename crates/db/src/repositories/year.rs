//! Year registry access and the one-time legacy migration.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use serde_json::{Map, Value, json};
use taxbook_core::budget::BudgetLineKind;
use taxbook_core::year::{ClosureReminder, YearRegistry, YearView, closure_reminder};
use taxbook_shared::types::OwnerId;
use tracing::info;

use super::{ProfileRepository, RepositoryError};
use crate::guard::OperationGuard;
use crate::store::{Document, Filter, SharedStore, WriteOp, collections};

/// Per-owner year registry operations.
#[derive(Clone)]
pub struct YearRepository {
    store: SharedStore,
    profiles: ProfileRepository,
    guard: OperationGuard,
    legacy_year: i32,
}

impl YearRepository {
    /// Creates a year repository. `legacy_year` is both the default active
    /// year and the year assigned to untagged records by the migration.
    #[must_use]
    pub fn new(store: SharedStore, guard: OperationGuard, legacy_year: i32) -> Self {
        Self {
            profiles: ProfileRepository::new(store.clone()),
            store,
            guard,
            legacy_year,
        }
    }

    /// The stored registry, or a fresh one for the legacy year.
    pub async fn registry(&self, owner_id: &OwnerId) -> Result<YearRegistry, RepositoryError> {
        Ok(self
            .profiles
            .registry(owner_id)
            .await?
            .unwrap_or_else(|| YearRegistry::new(self.legacy_year)))
    }

    /// Year currently open for editing.
    pub async fn active_year(&self, owner_id: &OwnerId) -> Result<i32, RepositoryError> {
        Ok(self.registry(owner_id).await?.active_year)
    }

    /// Closed years.
    pub async fn archived_years(&self, owner_id: &OwnerId) -> Result<BTreeSet<i32>, RepositoryError> {
        Ok(self.registry(owner_id).await?.archived_years)
    }

    /// Every known year, newest first.
    pub async fn list_years(&self, owner_id: &OwnerId) -> Result<Vec<YearView>, RepositoryError> {
        Ok(self.registry(owner_id).await?.years())
    }

    /// Describes `year` for viewing. Changes nothing.
    pub async fn switch_to_year(
        &self,
        owner_id: &OwnerId,
        year: i32,
    ) -> Result<YearView, RepositoryError> {
        Ok(self.registry(owner_id).await?.view(year)?)
    }

    /// Whether a closure reminder is due on `today`.
    pub async fn reminder(
        &self,
        owner_id: &OwnerId,
        today: NaiveDate,
    ) -> Result<Option<ClosureReminder>, RepositoryError> {
        let active_year = self.active_year(owner_id).await?;
        Ok(closure_reminder(active_year, today))
    }

    /// Tags pre-registry records with the legacy year and writes the
    /// registry. Safe to call repeatedly.
    pub async fn migrate_legacy_data(&self, owner_id: &OwnerId) -> Result<i32, RepositoryError> {
        let _permit = self.guard.acquire(owner_id, "migration")?;

        if let Some(registry) = self.profiles.registry(owner_id).await?
            && registry.migration_completed
        {
            return Ok(registry.active_year);
        }

        let legacy_year = self.legacy_year;
        self.profiles
            .init_registry(owner_id, &YearRegistry::migrated(legacy_year, Utc::now()))
            .await?;

        let mut ops = Vec::new();
        let mut transactions = 0usize;
        let mut budgets = 0usize;
        for (collection, counter) in [
            (collections::TRANSACTIONS, &mut transactions),
            (collections::BUDGETS, &mut budgets),
        ] {
            for doc in self.untagged(owner_id, collection).await? {
                let mut patch = json!({ "year": legacy_year, "archived": false });
                if collection == collections::BUDGETS
                    && let (Some(lines), Some(map)) = (flat_budget_lines(&doc), patch.as_object_mut())
                {
                    map.insert("lines".to_string(), lines);
                }
                ops.push(WriteOp::update(collection, doc.id, patch));
                *counter += 1;
            }
        }

        if !ops.is_empty() {
            self.store.batch_write(ops).await?;
        }

        info!(
            owner_id = %owner_id,
            year = legacy_year,
            transactions,
            budgets,
            "Legacy data migrated"
        );
        Ok(legacy_year)
    }

    async fn untagged(
        &self,
        owner_id: &OwnerId,
        collection: &str,
    ) -> Result<Vec<Document>, RepositoryError> {
        let docs = self
            .store
            .query_documents(collection, &[Filter::eq("ownerId", owner_id.as_str())], None)
            .await?;
        Ok(docs
            .into_iter()
            .filter(|doc| doc.field("year").is_none())
            .collect())
    }
}

/// Budget lines stored as top-level `inc_*`/`exp_*`/`oth_*` fields by the
/// pre-registry layout, merged over any nested `lines`.
fn flat_budget_lines(doc: &Document) -> Option<Value> {
    let data = doc.data.as_object()?;
    let mut lines: Map<String, Value> = doc
        .field("lines")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    let mut found = false;
    for (name, amount) in data {
        if BudgetLineKind::from_field(name).is_some() {
            lines.insert(name.clone(), amount.clone());
            found = true;
        }
    }
    found.then_some(Value::Object(lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DocumentStore, InMemoryStore};
    use std::sync::Arc;
    use taxbook_core::year::YearError;

    fn setup() -> (Arc<InMemoryStore>, YearRepository, OwnerId) {
        let store = Arc::new(InMemoryStore::new());
        let repo = YearRepository::new(store.clone(), OperationGuard::new(), 2025);
        (store, repo, OwnerId::new("owner-1"))
    }

    #[tokio::test]
    async fn test_defaults_without_profile() {
        let (_, repo, owner) = setup();
        assert_eq!(repo.active_year(&owner).await.unwrap(), 2025);
        assert!(repo.archived_years(&owner).await.unwrap().is_empty());
        assert_eq!(repo.list_years(&owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_migration_tags_only_untagged_records() {
        let (store, repo, owner) = setup();
        store
            .set_document(
                "transactions",
                "legacy",
                json!({"ownerId": "owner-1", "amount": "10"}),
                false,
            )
            .await
            .unwrap();
        store
            .set_document(
                "transactions",
                "tagged",
                json!({"ownerId": "owner-1", "year": 2024, "archived": true}),
                false,
            )
            .await
            .unwrap();
        store
            .set_document(
                "transactions",
                "foreign",
                json!({"ownerId": "owner-2"}),
                false,
            )
            .await
            .unwrap();
        store
            .set_document(
                "budgets",
                "owner-1_2025-01",
                json!({"ownerId": "owner-1", "yearMonth": "2025-01", "inc_salary": "1800"}),
                false,
            )
            .await
            .unwrap();

        assert_eq!(repo.migrate_legacy_data(&owner).await.unwrap(), 2025);

        let legacy = store.get_document("transactions", "legacy").await.unwrap().unwrap();
        assert_eq!(legacy.field("year"), Some(&json!(2025)));
        assert_eq!(legacy.field("archived"), Some(&json!(false)));

        let tagged = store.get_document("transactions", "tagged").await.unwrap().unwrap();
        assert_eq!(tagged.field("year"), Some(&json!(2024)));
        assert_eq!(tagged.field("archived"), Some(&json!(true)));

        let foreign = store.get_document("transactions", "foreign").await.unwrap().unwrap();
        assert!(foreign.field("year").is_none());

        let budget = store
            .get_document("budgets", "owner-1_2025-01")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(budget.field("year"), Some(&json!(2025)));
        assert_eq!(budget.field("lines"), Some(&json!({"inc_salary": "1800"})));

        let registry = repo.registry(&owner).await.unwrap();
        assert!(registry.migration_completed);
        assert!(registry.migrated_at.is_some());
    }

    #[tokio::test]
    async fn test_migration_is_idempotent() {
        let (store, repo, owner) = setup();
        repo.migrate_legacy_data(&owner).await.unwrap();

        let mut registry = repo.registry(&owner).await.unwrap();
        registry.record_closure(2025, Utc::now());
        ProfileRepository::new(store.clone())
            .update_registry(&owner, &registry)
            .await
            .unwrap();

        assert_eq!(repo.migrate_legacy_data(&owner).await.unwrap(), 2026);
        assert_eq!(repo.active_year(&owner).await.unwrap(), 2026);
    }

    #[tokio::test]
    async fn test_switch_to_year() {
        let (_, repo, owner) = setup();
        repo.migrate_legacy_data(&owner).await.unwrap();

        let view = repo.switch_to_year(&owner, 2025).await.unwrap();
        assert!(view.is_active);
        assert!(!view.is_archived);

        let err = repo.switch_to_year(&owner, 2019).await.unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Year(YearError::YearNotFound(2019))
        ));
    }

    #[tokio::test]
    async fn test_reminder_in_december() {
        let (_, repo, owner) = setup();
        let december = NaiveDate::from_ymd_opt(2025, 12, 3).unwrap();
        let june = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        assert_eq!(
            repo.reminder(&owner, december).await.unwrap(),
            Some(ClosureReminder::December)
        );
        assert_eq!(repo.reminder(&owner, june).await.unwrap(), None);
    }
}
