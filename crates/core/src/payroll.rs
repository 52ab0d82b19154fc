//! Payroll deductions generated from a gross salary.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::transaction::{Category, NewTransaction, TransactionKind};

/// Contribution rates applied to a gross salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayrollRates {
    /// Employee insurance share of gross pay (0.134 = 13.4 %).
    pub insurance_rate: Decimal,
    /// Flat monthly supplementary pension contribution.
    pub supplementary_pension: Decimal,
    /// Income tax advance rate applied to gross minus insurance.
    pub tax_advance_rate: Decimal,
}

impl Default for PayrollRates {
    fn default() -> Self {
        Self {
            insurance_rate: Decimal::new(134, 3),
            supplementary_pension: Decimal::new(1500, 2),
            tax_advance_rate: Decimal::new(19, 2),
        }
    }
}

fn money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Expense inputs withheld from a `gross` salary paid on `date`.
///
/// Returns insurance, supplementary pension and tax advance in that order.
/// The tax advance base uses the unrounded insurance figure. A deduction
/// that rounds to zero is left out.
#[must_use]
pub fn auto_deductions(gross: Decimal, date: NaiveDate, rates: &PayrollRates) -> Vec<NewTransaction> {
    let insurance = gross * rates.insurance_rate;
    let tax_advance = (gross - insurance) * rates.tax_advance_rate;

    [
        (Category::Insurance, money(insurance), "Auto insurance"),
        (
            Category::SupplementaryPension,
            money(rates.supplementary_pension),
            "Auto supplementary pension",
        ),
        (Category::TaxAdvance, money(tax_advance), "Auto tax advance"),
    ]
    .into_iter()
    .filter(|(_, amount, _)| *amount > Decimal::ZERO)
    .map(|(category, amount, note)| NewTransaction {
        date,
        kind: TransactionKind::Expense,
        category,
        amount,
        note: note.to_string(),
        number: None,
        account: None,
    })
    .collect()
}
