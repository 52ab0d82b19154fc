//! Budget data types.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use taxbook_shared::types::OwnerId;

use super::error::BudgetError;
use crate::validation::{ValidationError, validate_year_month};

/// Calendar month used as a budget key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    /// Calendar year.
    pub year: i32,
    /// Month, 1 to 12.
    pub month: u32,
}

impl YearMonth {
    /// Parses a `YYYY-MM` key.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let (year, month) = validate_year_month(value)?;
        Ok(Self { year, month })
    }

    /// Document id of the owner's entry for this month.
    #[must_use]
    pub fn document_id(&self, owner_id: &OwnerId) -> String {
        format!("{owner_id}_{self}")
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Classification of a budget line by its name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetLineKind {
    /// `inc_*` lines.
    Income,
    /// `exp_*` lines.
    Housing,
    /// `oth_*` lines.
    Other,
}

impl BudgetLineKind {
    /// Classifies a line name, `None` for unknown prefixes.
    #[must_use]
    pub fn from_field(name: &str) -> Option<Self> {
        if name.starts_with("inc_") {
            Some(Self::Income)
        } else if name.starts_with("exp_") {
            Some(Self::Housing)
        } else if name.starts_with("oth_") {
            Some(Self::Other)
        } else {
            None
        }
    }
}

/// Totals of one budget entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetTotals {
    /// Sum of income lines.
    pub income: Decimal,
    /// Sum of housing lines.
    pub housing: Decimal,
    /// Sum of other expense lines.
    pub other: Decimal,
    /// Housing plus other.
    pub total_expenses: Decimal,
    /// Income minus total expenses.
    pub balance: Decimal,
}

/// Budget for one owner and month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetEntry {
    /// Owning user.
    pub owner_id: OwnerId,
    /// `YYYY-MM` key.
    pub year_month: String,
    /// Year of the month.
    #[serde(default)]
    pub year: i32,
    /// True once the year has been closed.
    #[serde(default)]
    pub archived: bool,
    /// Last write timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Line name to amount.
    #[serde(default)]
    pub lines: BTreeMap<String, Decimal>,
}

impl BudgetEntry {
    /// Empty entry for `month`.
    #[must_use]
    pub fn empty(owner_id: OwnerId, month: YearMonth) -> Self {
        Self {
            owner_id,
            year_month: month.to_string(),
            year: month.year,
            archived: false,
            updated_at: None,
            lines: BTreeMap::new(),
        }
    }

    /// Checks that every line has a known prefix and a non-negative amount.
    pub fn check_lines(lines: &BTreeMap<String, Decimal>) -> Result<(), BudgetError> {
        for (name, amount) in lines {
            if BudgetLineKind::from_field(name).is_none() {
                return Err(BudgetError::UnknownLine(name.clone()));
            }
            if *amount < Decimal::ZERO {
                return Err(BudgetError::NegativeAmount(name.clone()));
            }
        }
        Ok(())
    }

    /// Sums the lines by kind. Lines with unknown prefixes are ignored.
    #[must_use]
    pub fn totals(&self) -> BudgetTotals {
        let mut totals = BudgetTotals::default();
        for (name, amount) in &self.lines {
            match BudgetLineKind::from_field(name) {
                Some(BudgetLineKind::Income) => totals.income += amount,
                Some(BudgetLineKind::Housing) => totals.housing += amount,
                Some(BudgetLineKind::Other) => totals.other += amount,
                None => {}
            }
        }
        totals.total_expenses = totals.housing + totals.other;
        totals.balance = totals.income - totals.total_expenses;
        totals
    }
}
