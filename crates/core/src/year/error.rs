//! Year registry and closure errors.

use thiserror::Error;

use super::state::{ClosureEvent, ClosureState};
use super::types::ClosureBlocker;

/// Year management errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum YearError {
    /// Year is neither the active year nor archived.
    #[error("Year {0} not found")]
    YearNotFound(i32),

    /// Operation requires the active year.
    #[error("Year {year} is not the active year ({active_year})")]
    NotActive {
        /// Requested year.
        year: i32,
        /// Currently active year.
        active_year: i32,
    },

    /// The owner has no year registry yet.
    #[error("Year registry not initialized, run the migration first")]
    RegistryMissing,

    /// Validation found blocking problems.
    #[error("Year {year} cannot be closed: {}", join_blockers(.errors))]
    ClosureBlocked {
        /// Year that failed validation.
        year: i32,
        /// Every blocking problem found.
        errors: Vec<ClosureBlocker>,
    },

    /// Transition not allowed from the current state.
    #[error("Cannot apply {event:?} in state {from:?}")]
    InvalidTransition {
        /// Current state.
        from: ClosureState,
        /// Rejected event.
        event: ClosureEvent,
    },

    /// Another year operation is running for this owner.
    #[error("Another year operation is already in progress for owner {0}")]
    OperationInProgress(String),
}

fn join_blockers(errors: &[ClosureBlocker]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
