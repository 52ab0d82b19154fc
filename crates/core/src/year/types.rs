//! Year closure data types.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use taxbook_shared::types::{OwnerId, SummaryId};

use crate::tax::TaxStats;

/// Result of looking up a year for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearView {
    /// Requested year.
    pub year: i32,
    /// Year has been closed and is read-only.
    pub is_archived: bool,
    /// Year is open for editing.
    pub is_active: bool,
}

/// Figures gathered while validating a year for closure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosureStats {
    /// Number of transactions in the year.
    pub total_transactions: usize,
    /// Distinct calendar months with at least one transaction.
    pub covered_months: usize,
    /// Sum of income amounts.
    pub total_income: Decimal,
    /// Sum of expense amounts.
    pub total_expenses: Decimal,
    /// Income minus expenses.
    pub balance: Decimal,
}

/// Problem that prevents a year from being closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ClosureBlocker {
    /// The year has no transactions at all.
    NoTransactions {
        /// Year checked.
        year: i32,
    },
}

impl fmt::Display for ClosureBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTransactions { year } => write!(f, "no transactions for year {year}"),
        }
    }
}

/// Problem worth reviewing that does not block closure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ClosureWarning {
    /// Transactions with an empty or generic category.
    Uncategorized {
        /// Number of affected transactions.
        count: usize,
    },
    /// Not every month of the year has a transaction.
    IncompleteMonths {
        /// Months covered.
        covered: usize,
    },
    /// Profile has no tax id.
    MissingTaxId,
    /// Profile has no bank account.
    MissingBankAccount,
}

impl fmt::Display for ClosureWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uncategorized { count } => {
                write!(f, "{count} transactions without a category or in \"other\"")
            }
            Self::IncompleteMonths { covered } => write!(f, "only {covered}/12 months covered"),
            Self::MissingTaxId => f.write_str("tax id is not filled in"),
            Self::MissingBankAccount => f.write_str("bank account is not filled in"),
        }
    }
}

/// Outcome of validating a year before closure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosureReport {
    /// Year checked.
    pub year: i32,
    /// True when there are no blocking errors.
    pub valid: bool,
    /// Blocking problems.
    pub errors: Vec<ClosureBlocker>,
    /// Non-blocking problems.
    pub warnings: Vec<ClosureWarning>,
    /// Year statistics.
    pub stats: ClosureStats,
}

/// Immutable snapshot written when a year is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    /// Identifier assigned by the store.
    pub id: SummaryId,
    /// Owning user.
    pub owner_id: OwnerId,
    /// Closed year.
    pub year: i32,
    /// Closure timestamp.
    pub closed_at: DateTime<Utc>,
    /// Statistics from the closure validation.
    pub final_stats: ClosureStats,
    /// Tax statistics for the year.
    pub tax_stats: TaxStats,
}

/// Why a closure reminder is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureReminder {
    /// It is December of the active year.
    December,
    /// It is January and the active year is already over.
    JanuaryNextYear,
}
