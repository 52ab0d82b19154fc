//! Transaction repository.

use chrono::{Datelike, Utc};
use serde_json::json;
use taxbook_core::payroll::{PayrollRates, auto_deductions};
use taxbook_core::transaction::{
    Category, NewTransaction, Transaction, TransactionDraft, TransactionKind,
};
use taxbook_core::year::YearError;
use taxbook_shared::types::{OwnerId, TransactionId};
use tracing::{info, warn};

use super::RepositoryError;
use crate::store::{
    Document, Filter, OrderBy, SharedStore, WriteOp, collections, new_document_id, to_data,
};

/// Transaction CRUD scoped to one owner.
#[derive(Clone)]
pub struct TransactionRepository {
    store: SharedStore,
}

fn record(owner_id: &OwnerId, id: TransactionId, input: NewTransaction) -> Transaction {
    Transaction {
        id,
        owner_id: owner_id.clone(),
        year: input.date.year(),
        date: input.date,
        kind: input.kind,
        category: input.category,
        amount: input.amount,
        note: input.note,
        number: input.number,
        account: input.account,
        archived: false,
        created_at: Utc::now(),
    }
}

fn decode_all(docs: &[Document]) -> Result<Vec<Transaction>, RepositoryError> {
    docs.iter()
        .map(|doc| doc.decode().map_err(RepositoryError::from))
        .collect()
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Validates `draft` against `active_year` and stores it.
    pub async fn create(
        &self,
        owner_id: &OwnerId,
        draft: TransactionDraft,
        active_year: i32,
    ) -> Result<Transaction, RepositoryError> {
        let input = draft.validate(active_year, Utc::now().date_naive())?;
        self.insert(owner_id, input).await
    }

    /// Stores already validated input.
    pub async fn insert(
        &self,
        owner_id: &OwnerId,
        input: NewTransaction,
    ) -> Result<Transaction, RepositoryError> {
        let mut tx = record(owner_id, TransactionId::new(""), input);
        let id = self
            .store
            .add_document(collections::TRANSACTIONS, to_data(&tx)?)
            .await?;
        tx.id = TransactionId::new(id);

        info!(owner_id = %owner_id, transaction_id = %tx.id, year = tx.year, "Transaction created");
        Ok(tx)
    }

    /// Stores a salary together with its generated deductions in one batch.
    ///
    /// The salary is always recorded as income; a generic category becomes
    /// [`Category::Salary`].
    pub async fn create_salary_with_deductions(
        &self,
        owner_id: &OwnerId,
        draft: TransactionDraft,
        active_year: i32,
        rates: &PayrollRates,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        let mut salary = draft.validate(active_year, Utc::now().date_naive())?;
        salary.kind = TransactionKind::Income;
        if salary.category.is_generic() {
            salary.category = Category::Salary;
        }
        let deductions = auto_deductions(salary.amount, salary.date, rates);

        let records: Vec<Transaction> = std::iter::once(salary)
            .chain(deductions)
            .map(|input| record(owner_id, TransactionId::new(new_document_id()), input))
            .collect();
        let ops = records
            .iter()
            .map(|tx| {
                Ok(WriteOp::set(
                    collections::TRANSACTIONS,
                    tx.id.as_str(),
                    to_data(tx)?,
                    false,
                ))
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;
        self.store.batch_write(ops).await?;

        info!(owner_id = %owner_id, count = records.len(), "Salary with deductions created");
        Ok(records)
    }

    /// Loads one of the owner's transactions.
    pub async fn get(&self, owner_id: &OwnerId, id: &str) -> Result<Transaction, RepositoryError> {
        let not_found = || RepositoryError::TransactionNotFound(id.to_string());
        let doc = self
            .store
            .get_document(collections::TRANSACTIONS, id)
            .await?
            .ok_or_else(not_found)?;
        let tx: Transaction = doc.decode()?;
        if &tx.owner_id != owner_id {
            return Err(not_found());
        }
        Ok(tx)
    }

    /// Loads a transaction that may still be changed: not archived and
    /// stored under the active year.
    async fn get_writable(
        &self,
        owner_id: &OwnerId,
        id: &str,
        active_year: i32,
    ) -> Result<Transaction, RepositoryError> {
        let current = self.get(owner_id, id).await?;
        if !current.is_editable() {
            warn!(owner_id = %owner_id, transaction_id = id, "Rejected change of archived transaction");
            return Err(RepositoryError::Archived(id.to_string()));
        }
        if current.year != active_year {
            warn!(
                owner_id = %owner_id,
                transaction_id = id,
                year = current.year,
                active_year,
                "Rejected change outside the active year"
            );
            return Err(YearError::NotActive {
                year: current.year,
                active_year,
            }
            .into());
        }
        Ok(current)
    }

    /// Replaces the editable fields of a transaction of the active year.
    ///
    /// The stored `year` never changes: the new date must fall in the same
    /// year the record already belongs to.
    pub async fn update(
        &self,
        owner_id: &OwnerId,
        id: &str,
        draft: TransactionDraft,
        active_year: i32,
    ) -> Result<Transaction, RepositoryError> {
        let current = self.get_writable(owner_id, id, active_year).await?;
        let patch = draft.validate(active_year, Utc::now().date_naive())?;

        let data = json!({
            "date": patch.date,
            "type": patch.kind,
            "category": patch.category,
            "amount": patch.amount,
            "note": patch.note,
            "number": patch.number,
            "account": patch.account,
        });
        self.store
            .update_document(collections::TRANSACTIONS, id, data)
            .await?;

        Ok(Transaction {
            date: patch.date,
            kind: patch.kind,
            category: patch.category,
            amount: patch.amount,
            note: patch.note,
            number: patch.number,
            account: patch.account,
            ..current
        })
    }

    /// Deletes a transaction of the active year that is not archived.
    pub async fn delete(
        &self,
        owner_id: &OwnerId,
        id: &str,
        active_year: i32,
    ) -> Result<(), RepositoryError> {
        self.get_writable(owner_id, id, active_year).await?;
        self.store
            .delete_document(collections::TRANSACTIONS, id)
            .await?;
        info!(owner_id = %owner_id, transaction_id = id, "Transaction deleted");
        Ok(())
    }

    /// The owner's transactions of `year`, newest first.
    pub async fn list_for_year(
        &self,
        owner_id: &OwnerId,
        year: i32,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        let docs = self
            .store
            .query_documents(
                collections::TRANSACTIONS,
                &[Filter::eq("ownerId", owner_id.as_str()), Filter::eq("year", year)],
                Some(&OrderBy::desc("date")),
            )
            .await?;
        decode_all(&docs)
    }

    /// Every transaction of the owner, newest first.
    pub async fn list_all(&self, owner_id: &OwnerId) -> Result<Vec<Transaction>, RepositoryError> {
        let docs = self
            .store
            .query_documents(
                collections::TRANSACTIONS,
                &[Filter::eq("ownerId", owner_id.as_str())],
                Some(&OrderBy::desc("date")),
            )
            .await?;
        decode_all(&docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DocumentStore, InMemoryStore};
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use taxbook_core::validation::ValidationError;

    fn draft(date: &str, kind: TransactionKind, category: &str, amount: &str) -> TransactionDraft {
        TransactionDraft {
            date: date.to_string(),
            kind,
            category: category.to_string(),
            amount: amount.to_string(),
            note: String::new(),
            number: None,
            account: Some("bank".to_string()),
        }
    }

    fn setup() -> (Arc<InMemoryStore>, TransactionRepository, OwnerId) {
        let store = Arc::new(InMemoryStore::new());
        let repo = TransactionRepository::new(store.clone());
        (store, repo, OwnerId::new("owner-1"))
    }

    #[tokio::test]
    async fn test_create_stamps_year_and_flags() {
        let (store, repo, owner) = setup();
        let tx = repo
            .create(&owner, draft("2025-03-01", TransactionKind::Income, "salary", "1500"), 2025)
            .await
            .unwrap();

        assert_eq!(tx.year, 2025);
        assert!(!tx.archived);
        let doc = store
            .get_document("transactions", tx.id.as_str())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.data["ownerId"], "owner-1");
        assert_eq!(doc.data["archived"], false);
        assert!(doc.data.get("id").is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_wrong_year_and_amount() {
        let (_, repo, owner) = setup();
        let err = repo
            .create(&owner, draft("2024-03-01", TransactionKind::Income, "salary", "10"), 2025)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Validation(ValidationError::YearMismatch { .. })
        ));

        let err = repo
            .create(&owner, draft("2025-03-01", TransactionKind::Income, "salary", "0"), 2025)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Validation(ValidationError::AmountNotPositive)
        ));
    }

    #[tokio::test]
    async fn test_salary_with_deductions() {
        let (store, repo, owner) = setup();
        let records = repo
            .create_salary_with_deductions(
                &owner,
                draft("2025-04-10", TransactionKind::Expense, "", "2000"),
                2025,
                &PayrollRates::default(),
            )
            .await
            .unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].kind, TransactionKind::Income);
        assert_eq!(records[0].category, Category::Salary);
        let deducted: Vec<_> = records[1..].iter().map(|t| t.amount).collect();
        assert_eq!(deducted, vec![dec!(268.00), dec!(15.00), dec!(329.08)]);
        assert_eq!(store.count("transactions").await, 4);
    }

    #[tokio::test]
    async fn test_tiny_salary_stores_only_positive_deductions() {
        let (store, repo, owner) = setup();
        let records = repo
            .create_salary_with_deductions(
                &owner,
                draft("2025-04-10", TransactionKind::Income, "salary", "0.02"),
                2025,
                &PayrollRates::default(),
            )
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|t| t.amount > rust_decimal::Decimal::ZERO));
        assert_eq!(records[1].category, Category::SupplementaryPension);
        assert_eq!(store.count("transactions").await, 2);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (_, repo, owner) = setup();
        let tx = repo
            .create(&owner, draft("2025-03-01", TransactionKind::Expense, "telecom", "20"), 2025)
            .await
            .unwrap();

        let updated = repo
            .update(
                &owner,
                tx.id.as_str(),
                draft("2025-03-02", TransactionKind::Expense, "mobile-carrier", "25"),
                2025,
            )
            .await
            .unwrap();
        assert_eq!(updated.amount, dec!(25));
        assert_eq!(updated.created_at, tx.created_at);

        let reloaded = repo.get(&owner, tx.id.as_str()).await.unwrap();
        assert_eq!(reloaded.category, Category::MobileCarrier);
        assert_eq!(reloaded.date, updated.date);

        repo.delete(&owner, tx.id.as_str(), 2025).await.unwrap();
        assert!(matches!(
            repo.get(&owner, tx.id.as_str()).await,
            Err(RepositoryError::TransactionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_archived_rejects_update_and_delete() {
        let (store, repo, owner) = setup();
        let tx = repo
            .create(&owner, draft("2025-03-01", TransactionKind::Expense, "telecom", "20"), 2025)
            .await
            .unwrap();
        store
            .update_document("transactions", tx.id.as_str(), json!({"archived": true}))
            .await
            .unwrap();

        let update = repo
            .update(
                &owner,
                tx.id.as_str(),
                draft("2025-03-02", TransactionKind::Expense, "telecom", "25"),
                2025,
            )
            .await;
        assert!(matches!(update, Err(RepositoryError::Archived(_))));
        assert!(matches!(
            repo.delete(&owner, tx.id.as_str(), 2025).await,
            Err(RepositoryError::Archived(_))
        ));
    }

    #[tokio::test]
    async fn test_other_owner_cannot_read() {
        let (_, repo, owner) = setup();
        let tx = repo
            .create(&owner, draft("2025-03-01", TransactionKind::Income, "salary", "10"), 2025)
            .await
            .unwrap();
        let stranger = OwnerId::new("owner-2");
        assert!(matches!(
            repo.get(&stranger, tx.id.as_str()).await,
            Err(RepositoryError::TransactionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_for_year_newest_first() {
        let (_, repo, owner) = setup();
        for date in ["2025-01-05", "2025-06-01", "2025-03-15"] {
            repo.create(&owner, draft(date, TransactionKind::Expense, "telecom", "5"), 2025)
                .await
                .unwrap();
        }

        let dates: Vec<String> = repo
            .list_for_year(&owner, 2025)
            .await
            .unwrap()
            .iter()
            .map(|t| t.date.to_string())
            .collect();
        assert_eq!(dates, vec!["2025-06-01", "2025-03-15", "2025-01-05"]);
        assert!(repo.list_for_year(&owner, 2024).await.unwrap().is_empty());
        assert_eq!(repo.list_all(&owner).await.unwrap().len(), 3);
    }
}
