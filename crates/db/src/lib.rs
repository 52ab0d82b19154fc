//! Persistence layer for taxbook.
//!
//! This crate provides:
//! - the [`DocumentStore`] abstraction with in-memory and `SeaORM` backends
//! - repositories for transactions, budgets, profiles and year summaries
//! - the year migration and closure workflows
//! - schema migrations for the `SeaORM` backend

pub mod entities;
pub mod guard;
pub mod migration;
pub mod repositories;
pub mod store;

pub use guard::{OperationGuard, OperationPermit};
pub use repositories::{
    BudgetRepository, ClosureOutcome, ClosureWorkflow, ProfileRepository, RepositoryError,
    SummaryRepository, TransactionRepository, UnlockOutcome, YearRepository,
};
pub use store::{DocumentStore, InMemoryStore, SeaOrmStore, SharedStore, StoreError};

use taxbook_shared::TaxDefaults;

/// Opens a `SeaORM` store and brings its schema up to date.
///
/// # Errors
///
/// Returns an error if the connection or the migration fails.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SeaOrmStore, StoreError> {
    let store = SeaOrmStore::connect(database_url, max_connections).await?;
    store.migrate().await?;
    Ok(store)
}

/// Every repository over one store, sharing a single operation guard.
#[derive(Clone)]
pub struct Repositories {
    /// Transactions.
    pub transactions: TransactionRepository,
    /// Monthly budgets.
    pub budgets: BudgetRepository,
    /// Profile and year registry document.
    pub profiles: ProfileRepository,
    /// Year summaries.
    pub summaries: SummaryRepository,
    /// Year registry and migration.
    pub years: YearRepository,
    /// Year closure and unlock.
    pub closure: ClosureWorkflow,
    /// Guard shared by migration, closure and unlock.
    pub guard: OperationGuard,
}

impl Repositories {
    /// Wires all repositories to `store`.
    #[must_use]
    pub fn new(store: SharedStore, tax: &TaxDefaults) -> Self {
        let guard = OperationGuard::new();
        Self {
            transactions: TransactionRepository::new(store.clone()),
            budgets: BudgetRepository::new(store.clone()),
            profiles: ProfileRepository::new(store.clone()),
            summaries: SummaryRepository::new(store.clone()),
            years: YearRepository::new(store.clone(), guard.clone(), tax.legacy_year),
            closure: ClosureWorkflow::new(store, guard.clone(), tax.clone()),
            guard,
        }
    }
}
