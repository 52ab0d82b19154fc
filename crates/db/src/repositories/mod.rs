//! Repository abstractions for data access.
//!
//! Repositories provide a typed interface over the document store, keeping
//! collection names, field layout and owner scoping out of the rest of the
//! application.

pub mod budget;
pub mod closure;
pub mod profile;
pub mod summary;
pub mod transaction;
pub mod year;

pub use budget::BudgetRepository;
pub use closure::{ClosureOutcome, ClosureWorkflow, UnlockOutcome};
pub use profile::ProfileRepository;
pub use summary::SummaryRepository;
pub use transaction::TransactionRepository;
pub use year::YearRepository;

use taxbook_core::budget::BudgetError;
use taxbook_core::validation::ValidationError;
use taxbook_core::year::YearError;

use crate::store::StoreError;

/// Errors returned by repositories.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Year registry or closure rule violated.
    #[error(transparent)]
    Year(#[from] YearError),

    /// Budget rule violated.
    #[error(transparent)]
    Budget(#[from] BudgetError),

    /// Transaction does not exist for this owner.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// Record belongs to a closed year.
    #[error("Transaction {0} is archived and cannot be modified")]
    Archived(String),

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Store(StoreError::Serialization(err))
    }
}
