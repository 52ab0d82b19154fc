//! Tax aggregation over a set of transactions.

use rust_decimal::Decimal;

use super::types::{TaxConfig, TaxStats};
use crate::transaction::{TaxBucket, Transaction};

/// Stateless tax aggregation.
pub struct TaxAggregator;

/// Per-bucket running totals.
#[derive(Debug, Default)]
struct Subtotals {
    income: Decimal,
    rent_income: Decimal,
    pension: Decimal,
    transport_allowance: Decimal,
    expenses: Decimal,
    rent_expenses: Decimal,
    insurance: Decimal,
    tax_advance: Decimal,
    supplementary_pension: Decimal,
}

impl Subtotals {
    fn add(&mut self, bucket: TaxBucket, amount: Decimal) {
        let slot = match bucket {
            TaxBucket::Income => &mut self.income,
            TaxBucket::RentIncome => &mut self.rent_income,
            TaxBucket::Pension => &mut self.pension,
            TaxBucket::TransportAllowance => &mut self.transport_allowance,
            TaxBucket::RentExpense => &mut self.rent_expenses,
            TaxBucket::Insurance => &mut self.insurance,
            TaxBucket::TaxAdvance => &mut self.tax_advance,
            TaxBucket::SupplementaryPension => &mut self.supplementary_pension,
        };
        *slot += amount;
    }
}

impl TaxAggregator {
    /// Computes tax statistics for the given transactions.
    ///
    /// Rental income up to the exemption threshold is fully exempt and its
    /// expenses are not deductible. Above the threshold only the taxable
    /// share of rental expenses is deductible:
    /// `deductible = rent_expenses * (taxable_rent / rent_income)`.
    ///
    /// `tax_to_pay` keeps its sign; use [`TaxStats::settlement`] to tell a
    /// liability from a refund.
    #[must_use]
    pub fn aggregate(transactions: &[Transaction], config: &TaxConfig) -> TaxStats {
        let mut totals = Subtotals::default();

        for tx in transactions {
            if !tx.is_income() {
                totals.expenses += tx.amount;
            }
            for bucket in tx.category.tax_buckets(tx.kind) {
                totals.add(bucket, tx.amount);
            }
        }

        let threshold = config.rent_exemption_threshold;
        let (taxable_rent_income, rent_expense_ratio, deductible_rent_expenses) =
            if totals.rent_income <= threshold {
                (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
            } else {
                let taxable = totals.rent_income - threshold;
                let ratio = if totals.rent_income.is_zero() {
                    Decimal::ZERO
                } else {
                    taxable / totals.rent_income
                };
                (taxable, ratio, totals.rent_expenses * ratio)
            };

        let tax_base_rent = taxable_rent_income - deductible_rent_expenses;
        let tax_base_income = totals.income - totals.insurance - totals.supplementary_pension;
        let final_tax_base = (tax_base_income + tax_base_rent).max(Decimal::ZERO);
        let tax_to_pay = final_tax_base * config.tax_rate - totals.tax_advance;
        let rent_tax = tax_base_rent * config.tax_rate;

        let total_real_income =
            totals.rent_income + totals.income + totals.pension + totals.transport_allowance;
        let profit_before_tax = total_real_income - totals.expenses;

        TaxStats {
            income: totals.income,
            rent_income: totals.rent_income,
            pension: totals.pension,
            transport_allowance: totals.transport_allowance,
            expenses: totals.expenses,
            rent_expenses: totals.rent_expenses,
            insurance: totals.insurance,
            tax_advance: totals.tax_advance,
            supplementary_pension: totals.supplementary_pension,
            rent_exemption_threshold: threshold,
            taxable_rent_income,
            rent_expense_ratio,
            deductible_rent_expenses,
            tax_base_rent,
            tax_base_income,
            final_tax_base,
            tax_to_pay,
            rent_tax,
            total_real_income,
            profit_before_tax,
        }
    }
}
