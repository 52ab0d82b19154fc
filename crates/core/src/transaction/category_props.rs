//! Property tests for category classification.

use proptest::prelude::*;

use super::category::{Category, keyword_expense_buckets, keyword_income_bucket};
use super::types::TransactionKind;

fn known_category() -> impl Strategy<Value = Category> {
    proptest::sample::select(Category::KNOWN.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The explicit table agrees with keyword matching on the stored labels,
    /// so a record classifies the same before and after it is re-parsed.
    #[test]
    fn prop_table_matches_keyword_fallback(category in known_category()) {
        prop_assert_eq!(
            category.tax_buckets(TransactionKind::Expense),
            keyword_expense_buckets(category.as_str())
        );
        prop_assert_eq!(
            category.tax_buckets(TransactionKind::Income),
            vec![keyword_income_bucket(category.as_str())]
        );
    }

    /// Income always contributes to exactly one bucket.
    #[test]
    fn prop_income_has_single_bucket(label in "[a-zA-Z -]{0,24}") {
        let category = Category::parse(&label);
        prop_assert_eq!(category.tax_buckets(TransactionKind::Income).len(), 1);
    }

    /// Parsing a stored label yields a category that stores the same label.
    #[test]
    fn prop_label_roundtrip(label in "[a-z][a-z -]{0,20}[a-z]") {
        let category = Category::parse(&label);
        prop_assert_eq!(Category::parse(category.as_str()), category);
    }
}
