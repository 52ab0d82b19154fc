//! Input validators for dates, amounts and identifiers.
//!
//! Every validator returns the parsed value on success and a specific
//! [`ValidationError`] otherwise, so callers can surface the exact reason.

pub mod error;
pub mod validators;

pub use error::ValidationError;
pub use validators::{
    MAX_AMOUNT, MIN_YEAR, validate_amount, validate_bank_account, validate_date,
    validate_date_on, validate_tax_id, validate_year_month,
};
