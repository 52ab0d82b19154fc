//! Pure closure checks.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use super::types::{ClosureBlocker, ClosureReminder, ClosureReport, ClosureStats, ClosureWarning};
use crate::profile::UserProfile;
use crate::transaction::Transaction;

/// Months a complete year covers.
const MONTHS_IN_YEAR: usize = 12;

/// Checks whether `year` can be closed.
///
/// `transactions` are the owner's records for `year`. A missing profile is
/// treated like an empty one, so missing identifiers are still reported.
#[must_use]
pub fn evaluate_closure(
    year: i32,
    transactions: &[Transaction],
    profile: Option<&UserProfile>,
) -> ClosureReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if transactions.is_empty() {
        errors.push(ClosureBlocker::NoTransactions { year });
    }

    let uncategorized = transactions
        .iter()
        .filter(|tx| tx.category.is_generic())
        .count();
    if uncategorized > 0 {
        warnings.push(ClosureWarning::Uncategorized {
            count: uncategorized,
        });
    }

    let months: BTreeSet<String> = transactions.iter().map(Transaction::month_key).collect();
    if months.len() < MONTHS_IN_YEAR {
        warnings.push(ClosureWarning::IncompleteMonths {
            covered: months.len(),
        });
    }

    let (tax_id, bank_account) =
        profile.map_or(("", ""), |p| (p.tax_id.as_str(), p.bank_account.as_str()));
    if tax_id.trim().is_empty() {
        warnings.push(ClosureWarning::MissingTaxId);
    }
    if bank_account.trim().is_empty() {
        warnings.push(ClosureWarning::MissingBankAccount);
    }

    let (total_income, total_expenses) =
        transactions
            .iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(inc, exp), tx| {
                if tx.is_income() {
                    (inc + tx.amount, exp)
                } else {
                    (inc, exp + tx.amount)
                }
            });

    ClosureReport {
        year,
        valid: errors.is_empty(),
        errors,
        warnings,
        stats: ClosureStats {
            total_transactions: transactions.len(),
            covered_months: months.len(),
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
        },
    }
}

/// Tells whether the user should be reminded to close `active_year`.
#[must_use]
pub fn closure_reminder(active_year: i32, today: NaiveDate) -> Option<ClosureReminder> {
    match today.month() {
        12 if today.year() == active_year => Some(ClosureReminder::December),
        1 if today.year() > active_year => Some(ClosureReminder::JanuaryNextYear),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::aggregator::tests::tx;
    use crate::transaction::TransactionKind;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn dated(month: u32, kind: TransactionKind, category: &str, amount: Decimal) -> Transaction {
        let mut t = tx(kind, category, amount);
        t.date = NaiveDate::from_ymd_opt(2025, month, 10).unwrap();
        t
    }

    fn complete_profile() -> UserProfile {
        UserProfile {
            tax_id: "SK1234567890".to_string(),
            bank_account: "SK3112000000198742637541".to_string(),
            ..UserProfile::default()
        }
    }

    #[test]
    fn test_empty_year_is_blocked() {
        let report = evaluate_closure(2025, &[], Some(&complete_profile()));
        assert!(!report.valid);
        assert_eq!(report.errors, vec![ClosureBlocker::NoTransactions { year: 2025 }]);
        assert_eq!(report.stats.total_transactions, 0);
    }

    #[test]
    fn test_full_year_has_no_warnings() {
        let txs: Vec<Transaction> = (1..=12)
            .map(|m| dated(m, TransactionKind::Income, "salary", dec!(1000)))
            .collect();

        let report = evaluate_closure(2025, &txs, Some(&complete_profile()));

        assert!(report.valid);
        assert!(report.warnings.is_empty());
        assert_eq!(report.stats.covered_months, 12);
        assert_eq!(report.stats.total_income, dec!(12000));
    }

    #[test]
    fn test_warnings_do_not_block() {
        let txs = vec![
            dated(1, TransactionKind::Income, "salary", dec!(1000)),
            dated(1, TransactionKind::Expense, "other", dec!(40)),
            dated(2, TransactionKind::Expense, "", dec!(60)),
        ];

        let report = evaluate_closure(2025, &txs, None);

        assert!(report.valid);
        assert_eq!(
            report.warnings,
            vec![
                ClosureWarning::Uncategorized { count: 2 },
                ClosureWarning::IncompleteMonths { covered: 2 },
                ClosureWarning::MissingTaxId,
                ClosureWarning::MissingBankAccount,
            ]
        );
        assert_eq!(report.stats.total_expenses, dec!(100));
        assert_eq!(report.stats.balance, dec!(900));
    }

    #[rstest]
    #[case(2025, (2025, 12, 1), Some(ClosureReminder::December))]
    #[case(2025, (2026, 1, 15), Some(ClosureReminder::JanuaryNextYear))]
    #[case(2025, (2025, 11, 30), None)]
    #[case(2025, (2025, 1, 15), None)]
    #[case(2025, (2026, 2, 1), None)]
    fn test_closure_reminder(
        #[case] active_year: i32,
        #[case] today: (i32, u32, u32),
        #[case] expected: Option<ClosureReminder>,
    ) {
        let (y, m, d) = today;
        let today = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(closure_reminder(active_year, today), expected);
    }
}
