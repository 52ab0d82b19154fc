//! Budget error types.

use thiserror::Error;

use crate::validation::ValidationError;

/// Budget-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// Month key is malformed.
    #[error(transparent)]
    InvalidMonth(#[from] ValidationError),

    /// Month belongs to a closed year.
    #[error("Budget for {0} is archived and cannot be modified")]
    Archived(String),

    /// Month is outside the active year.
    #[error("Budget month {year_month} is not in the active year {active_year}")]
    NotActiveYear {
        /// Requested month.
        year_month: String,
        /// Currently active year.
        active_year: i32,
    },

    /// Line name has no recognized prefix.
    #[error("Unknown budget line: {0}")]
    UnknownLine(String),

    /// Line amount is negative.
    #[error("Budget line {0} cannot be negative")]
    NegativeAmount(String),
}
