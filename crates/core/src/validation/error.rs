//! Validation error types.

use thiserror::Error;

/// Reasons an input value is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Date is missing.
    #[error("Date is required")]
    DateRequired,

    /// Date could not be parsed as `YYYY-MM-DD`.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Date is before the earliest supported year.
    #[error("Date is too old: year {0} is before {min}", min = super::MIN_YEAR)]
    DateTooOld(i32),

    /// Date lies in the future.
    #[error("Date cannot be in the future")]
    FutureDate,

    /// Date does not belong to the active year.
    #[error("Date must be in year {expected}, got {actual}")]
    YearMismatch {
        /// The active year.
        expected: i32,
        /// Year of the given date.
        actual: i32,
    },

    /// Amount is missing.
    #[error("Amount is required")]
    AmountRequired,

    /// Amount is not a number.
    #[error("Amount must be a number: {0}")]
    AmountNotNumeric(String),

    /// Amount is zero or negative.
    #[error("Amount must be greater than 0")]
    AmountNotPositive,

    /// Amount exceeds the sanity ceiling.
    #[error("Amount is too large (maximum {max})", max = super::MAX_AMOUNT)]
    AmountTooLarge,

    /// Tax id does not match `SK` followed by 10 digits.
    #[error("Tax id must be SK followed by 10 digits (e.g. SK1234567890)")]
    InvalidTaxId,

    /// Bank account does not match `SK` followed by 22 digits.
    #[error("Bank account must be SK followed by 22 digits")]
    InvalidBankAccount,

    /// Month key is not `YYYY-MM`.
    #[error("Invalid month {0}, expected YYYY-MM")]
    InvalidYearMonth(String),
}
