//! Monthly budget entries.
//!
//! A budget entry is a flat map of line name to amount for one owner and
//! month. The line name prefix decides whether a line is income, housing or
//! other spending.

pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::BudgetError;
pub use types::{BudgetEntry, BudgetLineKind, BudgetTotals, YearMonth};
