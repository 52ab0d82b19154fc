//! Overlapping year operations for one owner.

mod common;

use std::sync::Arc;

use futures::future::join_all;

use common::{GatedStore, draft, owner, shared};
use taxbook_core::transaction::TransactionKind;
use taxbook_core::year::YearError;
use taxbook_db::{InMemoryStore, OperationGuard, Repositories, RepositoryError};
use taxbook_shared::TaxDefaults;
use taxbook_shared::types::OwnerId;

#[tokio::test]
async fn test_second_closure_is_rejected_while_first_runs() {
    let store = GatedStore::new();
    let repos = Repositories::new(shared(&store), &TaxDefaults::default());
    let owner = owner();

    repos
        .profiles
        .init_registry(&owner, &taxbook_core::year::YearRegistry::new(2025))
        .await
        .unwrap();
    repos
        .transactions
        .create(&owner, draft("2025-04-01", TransactionKind::Income, "salary", "10"), 2025)
        .await
        .unwrap();

    let first = {
        let repos = repos.clone();
        let owner = owner.clone();
        tokio::spawn(async move { repos.closure.close_year(&owner, 2025).await })
    };
    store.entered.notified().await;
    assert!(repos.guard.is_busy(&owner));

    let err = repos.closure.close_year(&owner, 2025).await.unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Year(YearError::OperationInProgress(_))
    ));
    let err = repos.closure.unlock_year(&owner, 2025).await.unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Year(YearError::OperationInProgress(_))
    ));
    let err = repos.years.migrate_legacy_data(&owner).await.unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Year(YearError::OperationInProgress(_))
    ));

    store.release.notify_one();
    let outcome = first.await.unwrap().unwrap();
    assert_eq!(outcome.new_active_year, 2026);
    assert_eq!(repos.years.active_year(&owner).await.unwrap(), 2026);
    assert!(!repos.guard.is_busy(&owner));
}

#[tokio::test]
async fn test_guard_is_released_after_failure() {
    let store = Arc::new(InMemoryStore::new());
    let repos = Repositories::new(shared(&store), &TaxDefaults::default());
    let owner = owner();
    repos.years.migrate_legacy_data(&owner).await.unwrap();

    assert!(repos.closure.close_year(&owner, 2025).await.is_err());
    // a blocked closure must not keep the owner locked
    repos
        .transactions
        .create(&owner, draft("2025-04-01", TransactionKind::Income, "salary", "10"), 2025)
        .await
        .unwrap();
    assert!(repos.closure.close_year(&owner, 2025).await.is_ok());
}

#[tokio::test]
async fn test_external_permit_blocks_workflow() {
    let store = Arc::new(InMemoryStore::new());
    let guard = OperationGuard::new();
    let workflow =
        taxbook_db::ClosureWorkflow::new(shared(&store), guard.clone(), TaxDefaults::default());
    let owner = owner();

    let permit = guard.acquire(&owner, "test").unwrap();
    let err = workflow.close_year(&owner, 2025).await.unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Year(YearError::OperationInProgress(_))
    ));
    drop(permit);
    assert!(!guard.is_busy(&owner));
}

#[tokio::test]
async fn test_owners_migrate_independently() {
    let store = Arc::new(InMemoryStore::new());
    let repos = Repositories::new(shared(&store), &TaxDefaults::default());

    let owners: Vec<OwnerId> = (0..16).map(|i| OwnerId::new(format!("owner-{i}"))).collect();
    let results = join_all(owners.iter().map(|o| repos.years.migrate_legacy_data(o))).await;

    assert!(results.iter().all(|r| matches!(r, Ok(2025))));
    assert_eq!(store.count("users").await, 16);
}
