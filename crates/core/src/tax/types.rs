//! Tax aggregation types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use taxbook_shared::TaxDefaults;

/// Tax policy parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxConfig {
    /// Rental income up to this amount is exempt.
    pub rent_exemption_threshold: Decimal,
    /// Flat tax rate applied to the tax base (0.19 = 19 %).
    pub tax_rate: Decimal,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self::from(&TaxDefaults::default())
    }
}

impl From<&TaxDefaults> for TaxConfig {
    fn from(defaults: &TaxDefaults) -> Self {
        Self {
            rent_exemption_threshold: defaults.rent_exemption,
            tax_rate: defaults.tax_rate,
        }
    }
}

/// Every figure produced by the aggregation, intermediate ones included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxStats {
    /// Wage-type and unclassified income.
    pub income: Decimal,
    /// Gross rental income.
    pub rent_income: Decimal,
    /// Pension income.
    pub pension: Decimal,
    /// Tax-exempt transport allowance.
    pub transport_allowance: Decimal,
    /// Total of all expenses, each counted once.
    pub expenses: Decimal,
    /// Housing costs attributable to the rented property.
    pub rent_expenses: Decimal,
    /// Insurance contributions.
    pub insurance: Decimal,
    /// Tax advances already paid.
    pub tax_advance: Decimal,
    /// Supplementary pension contributions.
    pub supplementary_pension: Decimal,
    /// Exemption threshold the figures were computed with.
    pub rent_exemption_threshold: Decimal,
    /// Rental income above the exemption.
    pub taxable_rent_income: Decimal,
    /// Taxable share of rental income (0 when there is none).
    pub rent_expense_ratio: Decimal,
    /// Rental expenses deductible in proportion to the taxable share.
    pub deductible_rent_expenses: Decimal,
    /// Rental tax base, may be negative.
    pub tax_base_rent: Decimal,
    /// Wage tax base net of insurance and supplementary pension.
    pub tax_base_income: Decimal,
    /// Combined tax base, never negative.
    pub final_tax_base: Decimal,
    /// Tax due after advances; negative means a refund.
    pub tax_to_pay: Decimal,
    /// Informational tax attributable to rental income.
    pub rent_tax: Decimal,
    /// All income actually received.
    pub total_real_income: Decimal,
    /// Total real income minus expenses.
    pub profit_before_tax: Decimal,
}

/// Outcome of the annual settlement against advances paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "amount", rename_all = "snake_case")]
pub enum Settlement {
    /// Tax still owed.
    Payable(Decimal),
    /// Advances exceeded the liability; the amount is returned.
    Refund(Decimal),
    /// Advances match the liability exactly.
    Settled,
}

impl TaxStats {
    /// Classifies `tax_to_pay` by sign.
    #[must_use]
    pub fn settlement(&self) -> Settlement {
        match self.tax_to_pay.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Greater => Settlement::Payable(self.tax_to_pay),
            std::cmp::Ordering::Less => Settlement::Refund(-self.tax_to_pay),
            std::cmp::Ordering::Equal => Settlement::Settled,
        }
    }
}
