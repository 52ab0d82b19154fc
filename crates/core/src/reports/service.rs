//! Report calculations.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::types::{
    CategoryTotal, ExportSummary, MonthlyTotals, ReportFilter, ReportSummary, YearExport,
};
use crate::profile::UserProfile;
use crate::transaction::Transaction;

/// Stateless report builder.
pub struct ReportService;

impl ReportService {
    /// Transactions accepted by `filter`, oldest first.
    #[must_use]
    pub fn filter_transactions(
        transactions: &[Transaction],
        filter: &ReportFilter,
    ) -> Vec<Transaction> {
        let mut selected: Vec<Transaction> = transactions
            .iter()
            .filter(|tx| filter.accepts(tx))
            .cloned()
            .collect();
        selected.sort_by_key(|tx| tx.date);
        selected
    }

    /// Income, expense and balance totals.
    #[must_use]
    pub fn summarize(transactions: &[Transaction]) -> ReportSummary {
        let mut summary = ReportSummary {
            count: transactions.len(),
            ..ReportSummary::default()
        };
        for tx in transactions {
            if tx.is_income() {
                summary.income += tx.amount;
            } else {
                summary.expenses += tx.amount;
            }
        }
        summary.balance = summary.income - summary.expenses;
        summary
    }

    /// Totals per calendar month, in month order.
    #[must_use]
    pub fn monthly_breakdown(transactions: &[Transaction]) -> Vec<MonthlyTotals> {
        let mut months: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
        for tx in transactions {
            let slot = months.entry(tx.month_key()).or_default();
            if tx.is_income() {
                slot.0 += tx.amount;
            } else {
                slot.1 += tx.amount;
            }
        }
        months
            .into_iter()
            .map(|(month, (income, expenses))| MonthlyTotals {
                month,
                income,
                expenses,
            })
            .collect()
    }

    /// Expense totals per category, largest first.
    #[must_use]
    pub fn expense_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for tx in transactions.iter().filter(|tx| !tx.is_income()) {
            let label = match tx.category.display_name() {
                "" => "Other",
                name => name,
            };
            *totals.entry(label.to_string()).or_default() += tx.amount;
        }
        let mut breakdown: Vec<CategoryTotal> = totals
            .into_iter()
            .map(|(label, total)| CategoryTotal { label, total })
            .collect();
        breakdown.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.label.cmp(&b.label)));
        breakdown
    }

    /// Export of `year`'s non-archived transactions.
    #[must_use]
    pub fn build_year_export(
        year: i32,
        transactions: &[Transaction],
        profile: Option<&UserProfile>,
        exported_at: DateTime<Utc>,
    ) -> YearExport {
        let mut open: Vec<Transaction> = transactions
            .iter()
            .filter(|tx| tx.year == year && !tx.archived)
            .cloned()
            .collect();
        open.sort_by_key(|tx| tx.date);

        let totals = Self::summarize(&open);
        YearExport {
            exported_at,
            year,
            owner_name: profile.map(|p| p.name.clone()).unwrap_or_default(),
            summary: ExportSummary {
                total_transactions: open.len(),
                total_income: totals.income,
                total_expenses: totals.expenses,
            },
            transactions: open,
        }
    }
}
