//! Report data types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transaction::{Category, Transaction, TransactionKind};

/// Category group offered as a report filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportGroup {
    /// Salary and pension.
    Wages,
    /// Rental income.
    Rent,
    /// Insurance, tax advances and supplementary pension.
    Taxes,
    /// Housing cooperative and property tax.
    Housing,
    /// Electricity and other utilities.
    Energy,
    /// Internet, TV and phone.
    Media,
    /// Uncategorized and generic records.
    Other,
}

impl ReportGroup {
    /// Every group.
    pub const ALL: [Self; 7] = [
        Self::Wages,
        Self::Rent,
        Self::Taxes,
        Self::Housing,
        Self::Energy,
        Self::Media,
        Self::Other,
    ];

    /// True when `category` belongs to this group.
    #[must_use]
    pub fn matches(self, category: &Category) -> bool {
        match category {
            Category::Custom(label) if !category.is_generic() => {
                let label = label.to_lowercase();
                self.keywords().iter().any(|k| label.contains(k))
            }
            _ => self.includes(category),
        }
    }

    fn includes(self, category: &Category) -> bool {
        match self {
            Self::Wages => matches!(category, Category::Salary | Category::Pension),
            Self::Rent => matches!(category, Category::RentIncome),
            Self::Taxes => matches!(
                category,
                Category::Insurance | Category::TaxAdvance | Category::SupplementaryPension
            ),
            Self::Housing => matches!(
                category,
                Category::HousingCooperative | Category::MunicipalTax
            ),
            Self::Energy => matches!(category, Category::UtilityProvider),
            Self::Media => matches!(category, Category::Telecom | Category::MobileCarrier),
            Self::Other => category.is_generic(),
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Wages => &["salary", "wage", "pension"],
            Self::Rent => &["rent"],
            Self::Taxes => &["insurance", "advance", "dds"],
            Self::Housing => &["housing", "municipal"],
            Self::Energy => &["utility", "electric", "energy"],
            Self::Media => &["telecom", "internet", "mobile"],
            Self::Other => &[],
        }
    }
}

/// Selection criteria for a report.
///
/// Bounds are inclusive. An empty `groups` list selects every category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    /// First date included.
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    /// Last date included.
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
    /// Restrict to income or expenses.
    #[serde(default)]
    pub kind: Option<TransactionKind>,
    /// Category groups to include.
    #[serde(default)]
    pub groups: Vec<ReportGroup>,
}

impl ReportFilter {
    /// True when `tx` satisfies every criterion.
    #[must_use]
    pub fn accepts(&self, tx: &Transaction) -> bool {
        if self.date_from.is_some_and(|from| tx.date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| tx.date > to) {
            return false;
        }
        if self.kind.is_some_and(|kind| tx.kind != kind) {
            return false;
        }
        self.groups.is_empty() || self.groups.iter().any(|g| g.matches(&tx.category))
    }
}

/// Income, expense and balance of a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Number of transactions.
    pub count: usize,
    /// Sum of income.
    pub income: Decimal,
    /// Sum of expenses.
    pub expenses: Decimal,
    /// Income minus expenses.
    pub balance: Decimal,
}

/// Income and expenses of one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotals {
    /// `YYYY-MM` key.
    pub month: String,
    /// Sum of income.
    pub income: Decimal,
    /// Sum of expenses.
    pub expenses: Decimal,
}

/// Expense total of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// Category label as shown to the user.
    pub label: String,
    /// Sum of expenses.
    pub total: Decimal,
}

/// Totals attached to a year export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    /// Number of exported transactions.
    pub total_transactions: usize,
    /// Sum of income.
    pub total_income: Decimal,
    /// Sum of expenses.
    pub total_expenses: Decimal,
}

/// Snapshot of a year's open transactions for download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearExport {
    /// Export timestamp.
    pub exported_at: DateTime<Utc>,
    /// Exported year.
    pub year: i32,
    /// Owner display name.
    pub owner_name: String,
    /// Non-archived transactions of the year, oldest first.
    pub transactions: Vec<Transaction>,
    /// Totals.
    pub summary: ExportSummary,
}
