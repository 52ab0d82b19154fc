//! Category vocabulary and the tax bucket classification table.
//!
//! Known categories map to buckets through an explicit table. Any other
//! label is kept verbatim as [`Category::Custom`] and classified by keyword
//! matching on its lower-cased text, so imported or hand-typed labels still
//! land in the right subtotal.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::TransactionKind;

/// Subtotal a transaction contributes to in the tax statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxBucket {
    /// Wage-type income, taxable.
    Income,
    /// Rental income, subject to the exemption threshold.
    RentIncome,
    /// Pension income.
    Pension,
    /// Tax-exempt transport allowance.
    TransportAllowance,
    /// Housing cost deductible against rental income.
    RentExpense,
    /// Mandatory insurance contributions.
    Insurance,
    /// Income tax paid in advance.
    TaxAdvance,
    /// Voluntary supplementary pension contributions.
    SupplementaryPension,
}

/// Transaction category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// Employment salary.
    Salary,
    /// Income from renting out property.
    RentIncome,
    /// Pension received.
    Pension,
    /// Employer transport allowance.
    TransportAllowance,
    /// Housing cooperative fees.
    HousingCooperative,
    /// Fixed-line telecom and internet.
    Telecom,
    /// Mobile carrier bills.
    MobileCarrier,
    /// Electricity, gas and water provider.
    UtilityProvider,
    /// Municipal property tax.
    MunicipalTax,
    /// Insurance contributions.
    Insurance,
    /// Income tax advance payments.
    TaxAdvance,
    /// Supplementary pension scheme contributions.
    SupplementaryPension,
    /// Generic bucket for anything else.
    Other,
    /// Label outside the known vocabulary, kept as entered.
    Custom(String),
}

/// Housing-cost keywords that mark an expense as deductible against rent.
const HOUSING_KEYWORDS: &[&str] = &[
    "housing cooperative",
    "telecom",
    "mobile carrier",
    "utility provider",
    "municipal tax",
];

/// Keyword rules for expenses; every matching rule applies.
const EXPENSE_RULES: &[(&[&str], TaxBucket)] = &[
    (HOUSING_KEYWORDS, TaxBucket::RentExpense),
    (&["insurance"], TaxBucket::Insurance),
    (&["advance"], TaxBucket::TaxAdvance),
    (&["dds", "supplementary pension"], TaxBucket::SupplementaryPension),
];

/// Keyword rules for income; the first matching rule wins.
const INCOME_RULES: &[(&str, TaxBucket)] = &[
    ("rent", TaxBucket::RentIncome),
    ("pension", TaxBucket::Pension),
    ("transport allowance", TaxBucket::TransportAllowance),
];

impl Category {
    /// Every named category, in display order.
    pub const KNOWN: [Self; 13] = [
        Self::Salary,
        Self::RentIncome,
        Self::Pension,
        Self::TransportAllowance,
        Self::HousingCooperative,
        Self::Telecom,
        Self::MobileCarrier,
        Self::UtilityProvider,
        Self::MunicipalTax,
        Self::Insurance,
        Self::TaxAdvance,
        Self::SupplementaryPension,
        Self::Other,
    ];

    /// Parses a category label. Unknown labels become [`Category::Custom`].
    #[must_use]
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        Self::KNOWN
            .into_iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(trimmed))
            .unwrap_or_else(|| Self::Custom(trimmed.to_string()))
    }

    /// Returns the stored label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Salary => "salary",
            Self::RentIncome => "rent-income",
            Self::Pension => "pension",
            Self::TransportAllowance => "transport-allowance",
            Self::HousingCooperative => "housing-cooperative",
            Self::Telecom => "telecom",
            Self::MobileCarrier => "mobile-carrier",
            Self::UtilityProvider => "utility-provider",
            Self::MunicipalTax => "municipal-tax",
            Self::Insurance => "insurance",
            Self::TaxAdvance => "tax-advance",
            Self::SupplementaryPension => "supplementary-pension",
            Self::Other => "other",
            Self::Custom(label) => label,
        }
    }

    /// Human readable label for reports.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Salary => "Salary",
            Self::RentIncome => "Rental income",
            Self::Pension => "Pension",
            Self::TransportAllowance => "Transport allowance",
            Self::HousingCooperative => "Housing cooperative",
            Self::Telecom => "Internet & TV",
            Self::MobileCarrier => "Mobile phone",
            Self::UtilityProvider => "Electricity",
            Self::MunicipalTax => "Property tax",
            Self::Insurance => "Insurance contributions",
            Self::TaxAdvance => "Tax advance",
            Self::SupplementaryPension => "Supplementary pension",
            Self::Other => "Other",
            Self::Custom(label) => label,
        }
    }

    /// True when the category is empty or the generic "other" bucket.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        match self {
            Self::Other => true,
            Self::Custom(label) => {
                let label = label.trim();
                label.is_empty() || normalize(label).contains("other")
            }
            _ => false,
        }
    }

    /// Returns the tax buckets a transaction of `kind` in this category
    /// contributes to.
    ///
    /// Income always lands in exactly one bucket. An expense may match
    /// several buckets at once, or none.
    #[must_use]
    pub fn tax_buckets(&self, kind: TransactionKind) -> Vec<TaxBucket> {
        match kind {
            TransactionKind::Income => vec![self.income_bucket()],
            TransactionKind::Expense => self.expense_buckets(),
        }
    }

    fn income_bucket(&self) -> TaxBucket {
        match self {
            Self::Salary | Self::Other => TaxBucket::Income,
            Self::RentIncome => TaxBucket::RentIncome,
            Self::Pension => TaxBucket::Pension,
            Self::TransportAllowance => TaxBucket::TransportAllowance,
            _ => keyword_income_bucket(self.as_str()),
        }
    }

    fn expense_buckets(&self) -> Vec<TaxBucket> {
        match self {
            Self::HousingCooperative
            | Self::Telecom
            | Self::MobileCarrier
            | Self::UtilityProvider
            | Self::MunicipalTax => vec![TaxBucket::RentExpense],
            Self::Insurance => vec![TaxBucket::Insurance],
            Self::TaxAdvance => vec![TaxBucket::TaxAdvance],
            Self::SupplementaryPension => vec![TaxBucket::SupplementaryPension],
            Self::Other => Vec::new(),
            _ => keyword_expense_buckets(self.as_str()),
        }
    }
}

/// Classifies an income label by keyword.
#[must_use]
pub fn keyword_income_bucket(label: &str) -> TaxBucket {
    let text = normalize(label);
    INCOME_RULES
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map_or(TaxBucket::Income, |(_, bucket)| *bucket)
}

/// Classifies an expense label by keyword.
#[must_use]
pub fn keyword_expense_buckets(label: &str) -> Vec<TaxBucket> {
    let text = normalize(label);
    EXPENSE_RULES
        .iter()
        .filter(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, bucket)| *bucket)
        .collect()
}

/// Lower-cases and treats `-`/`_` as spaces so slugs match phrase keywords.
fn normalize(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect()
}

impl Default for Category {
    fn default() -> Self {
        Self::Custom(String::new())
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Custom(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
