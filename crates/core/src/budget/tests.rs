//! Budget tests.

use std::collections::BTreeMap;

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use taxbook_shared::types::OwnerId;

use super::error::BudgetError;
use super::types::{BudgetEntry, BudgetLineKind, YearMonth};

fn entry(lines: &[(&str, Decimal)]) -> BudgetEntry {
    let mut entry = BudgetEntry::empty(OwnerId::new("owner-1"), YearMonth::parse("2025-03").unwrap());
    entry.lines = lines.iter().map(|(k, v)| ((*k).to_string(), *v)).collect();
    entry
}

#[test]
fn test_line_kind_from_prefix() {
    assert_eq!(BudgetLineKind::from_field("inc_salary"), Some(BudgetLineKind::Income));
    assert_eq!(BudgetLineKind::from_field("exp_energy"), Some(BudgetLineKind::Housing));
    assert_eq!(BudgetLineKind::from_field("oth_food"), Some(BudgetLineKind::Other));
    assert_eq!(BudgetLineKind::from_field("salary"), None);
}

#[test]
fn test_totals() {
    let totals = entry(&[
        ("inc_salary", dec!(2000)),
        ("inc_rent", dec!(800)),
        ("exp_cooperative", dec!(250)),
        ("exp_energy", dec!(90.50)),
        ("oth_food", dec!(400)),
    ])
    .totals();

    assert_eq!(totals.income, dec!(2800));
    assert_eq!(totals.housing, dec!(340.50));
    assert_eq!(totals.other, dec!(400));
    assert_eq!(totals.total_expenses, dec!(740.50));
    assert_eq!(totals.balance, dec!(2059.50));
}

#[test]
fn test_check_lines() {
    let ok: BTreeMap<String, Decimal> = [("inc_salary".to_string(), dec!(1))].into();
    assert!(BudgetEntry::check_lines(&ok).is_ok());

    let unknown: BTreeMap<String, Decimal> = [("salary".to_string(), dec!(1))].into();
    assert_eq!(
        BudgetEntry::check_lines(&unknown),
        Err(BudgetError::UnknownLine("salary".to_string()))
    );

    let negative: BTreeMap<String, Decimal> = [("oth_food".to_string(), dec!(-1))].into();
    assert_eq!(
        BudgetEntry::check_lines(&negative),
        Err(BudgetError::NegativeAmount("oth_food".to_string()))
    );
}

#[test]
fn test_year_month_document_id() {
    let month = YearMonth::parse("2025-07").unwrap();
    assert_eq!(month.to_string(), "2025-07");
    assert_eq!(month.document_id(&OwnerId::new("abc")), "abc_2025-07");
    assert!(YearMonth::parse("2025-7").is_err());
}

#[test]
fn test_serialized_layout() {
    let value = serde_json::to_value(entry(&[("inc_salary", dec!(100))])).unwrap();
    assert_eq!(value["yearMonth"], "2025-03");
    assert_eq!(value["year"], 2025);
    assert_eq!(value["lines"]["inc_salary"], "100");
}

proptest! {
    /// income - (housing + other) == balance for any set of lines.
    #[test]
    fn prop_balance_identity(
        income in proptest::collection::vec(0i64..1_000_000, 0..5),
        housing in proptest::collection::vec(0i64..1_000_000, 0..5),
        other in proptest::collection::vec(0i64..1_000_000, 0..5),
    ) {
        let mut lines = Vec::new();
        for (i, cents) in income.iter().enumerate() {
            lines.push((format!("inc_{i}"), Decimal::new(*cents, 2)));
        }
        for (i, cents) in housing.iter().enumerate() {
            lines.push((format!("exp_{i}"), Decimal::new(*cents, 2)));
        }
        for (i, cents) in other.iter().enumerate() {
            lines.push((format!("oth_{i}"), Decimal::new(*cents, 2)));
        }
        let mut e = entry(&[]);
        e.lines = lines.into_iter().collect();

        let totals = e.totals();
        prop_assert_eq!(totals.income - totals.total_expenses, totals.balance);
        prop_assert_eq!(totals.housing + totals.other, totals.total_expenses);
    }
}
