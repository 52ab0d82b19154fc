//! User profile fields stored alongside the year registry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use taxbook_shared::TaxDefaults;

use crate::tax::TaxConfig;
use crate::validation::{ValidationError, validate_bank_account, validate_tax_id};

/// Personal and tax policy settings of one owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// National tax id, empty when unknown.
    #[serde(default)]
    pub tax_id: String,
    /// Postal address.
    #[serde(default)]
    pub address: String,
    /// Bank account without whitespace, empty when unknown.
    #[serde(default)]
    pub bank_account: String,
    /// Rental income exemption threshold override.
    #[serde(default)]
    pub rent_exemption: Option<Decimal>,
    /// Tax rate override.
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
}

impl UserProfile {
    /// Validates identifiers and normalizes the bank account in place.
    pub fn normalize(mut self) -> Result<Self, ValidationError> {
        self.tax_id = self.tax_id.trim().to_string();
        validate_tax_id(&self.tax_id)?;
        self.bank_account = validate_bank_account(&self.bank_account)?;
        Ok(self)
    }

    /// Tax parameters of this profile, falling back to `defaults`.
    #[must_use]
    pub fn tax_config(&self, defaults: &TaxDefaults) -> TaxConfig {
        TaxConfig {
            rent_exemption_threshold: self.rent_exemption.unwrap_or(defaults.rent_exemption),
            tax_rate: self.tax_rate.unwrap_or(defaults.tax_rate),
        }
    }
}
