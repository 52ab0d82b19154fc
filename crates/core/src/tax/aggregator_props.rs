//! Property tests for tax aggregation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::aggregator::TaxAggregator;
use super::aggregator::tests::tx;
use super::types::TaxConfig;
use crate::transaction::{Transaction, TransactionKind};

const LABELS: &[&str] = &[
    "salary",
    "rent-income",
    "pension",
    "transport-allowance",
    "housing-cooperative",
    "telecom",
    "insurance",
    "tax-advance",
    "supplementary-pension",
    "other",
    "groceries",
    "room rent",
];

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..5_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn transaction_strategy() -> impl Strategy<Value = Transaction> {
    (
        prop_oneof![Just(TransactionKind::Income), Just(TransactionKind::Expense)],
        proptest::sample::select(LABELS),
        amount_strategy(),
    )
        .prop_map(|(kind, label, amount)| tx(kind, label, amount))
}

fn config_strategy() -> impl Strategy<Value = TaxConfig> {
    (0i64..200_000, 0i64..50).prop_map(|(threshold_cents, rate_pct)| TaxConfig {
        rent_exemption_threshold: Decimal::new(threshold_cents, 2),
        tax_rate: Decimal::new(rate_pct, 2),
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// income + rent + pension + transport allowance - expenses == profit.
    #[test]
    fn prop_profit_identity(
        txs in proptest::collection::vec(transaction_strategy(), 0..40),
        config in config_strategy(),
    ) {
        let stats = TaxAggregator::aggregate(&txs, &config);
        prop_assert_eq!(
            stats.income + stats.rent_income + stats.pension + stats.transport_allowance
                - stats.expenses,
            stats.profit_before_tax
        );
    }

    /// Rental income within the threshold never produces a rental tax base.
    #[test]
    fn prop_exempt_rent_has_zero_base(
        rent in amount_strategy(),
        expenses in proptest::collection::vec(amount_strategy(), 0..5),
        headroom in 0i64..100_000,
    ) {
        let mut txs = vec![tx(TransactionKind::Income, "rent-income", rent)];
        txs.extend(expenses.into_iter().map(|a| tx(TransactionKind::Expense, "telecom", a)));
        let config = TaxConfig {
            rent_exemption_threshold: rent + Decimal::new(headroom, 2),
            tax_rate: Decimal::new(19, 2),
        };

        let stats = TaxAggregator::aggregate(&txs, &config);
        prop_assert_eq!(stats.tax_base_rent, Decimal::ZERO);
        prop_assert_eq!(stats.deductible_rent_expenses, Decimal::ZERO);
    }

    /// Without rental expenses the rental base is income above the threshold.
    #[test]
    fn prop_rent_without_expenses(
        threshold in amount_strategy(),
        excess in amount_strategy(),
    ) {
        let rent = threshold + excess;
        let txs = vec![tx(TransactionKind::Income, "rent-income", rent)];
        let config = TaxConfig {
            rent_exemption_threshold: threshold,
            tax_rate: Decimal::new(19, 2),
        };

        let stats = TaxAggregator::aggregate(&txs, &config);
        prop_assert_eq!(stats.tax_base_rent, rent - threshold);
    }

    /// Aggregation is pure: same input, same output, input untouched.
    #[test]
    fn prop_aggregate_is_pure(
        txs in proptest::collection::vec(transaction_strategy(), 0..20),
        config in config_strategy(),
    ) {
        let before = txs.clone();
        let first = TaxAggregator::aggregate(&txs, &config);
        let second = TaxAggregator::aggregate(&txs, &config);
        prop_assert_eq!(first, second);
        prop_assert_eq!(txs, before);
    }

    /// The final base is never negative.
    #[test]
    fn prop_final_base_non_negative(
        txs in proptest::collection::vec(transaction_strategy(), 0..40),
        config in config_strategy(),
    ) {
        let stats = TaxAggregator::aggregate(&txs, &config);
        prop_assert!(stats.final_tax_base >= Decimal::ZERO);
    }
}
