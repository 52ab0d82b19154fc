//! Validator functions.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::error::ValidationError;

/// Earliest calendar year accepted for a transaction date.
pub const MIN_YEAR: i32 = 2000;

/// Upper bound for a single amount.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

const COUNTRY_PREFIX: &str = "SK";
const TAX_ID_DIGITS: usize = 10;
const BANK_ACCOUNT_DIGITS: usize = 22;

/// Validates a transaction date against the active year using today's date.
pub fn validate_date(
    value: &str,
    active_year: i32,
    allow_future: bool,
) -> Result<NaiveDate, ValidationError> {
    validate_date_on(value, active_year, allow_future, Utc::now().date_naive())
}

/// Validates a transaction date against the active year and an explicit
/// `today`.
///
/// Checks run in order: presence, format, minimum year, future dates and
/// finally the active year, so the first failing rule is reported.
pub fn validate_date_on(
    value: &str,
    active_year: i32,
    allow_future: bool,
    today: NaiveDate,
) -> Result<NaiveDate, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::DateRequired);
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))?;

    if date.year() < MIN_YEAR {
        return Err(ValidationError::DateTooOld(date.year()));
    }
    if !allow_future && date > today {
        return Err(ValidationError::FutureDate);
    }
    if date.year() != active_year {
        return Err(ValidationError::YearMismatch {
            expected: active_year,
            actual: date.year(),
        });
    }

    Ok(date)
}

/// Parses and validates a positive amount no larger than [`MAX_AMOUNT`].
pub fn validate_amount(value: &str) -> Result<Decimal, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::AmountRequired);
    }

    let amount = Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| ValidationError::AmountNotNumeric(value.to_string()))?;

    if amount <= Decimal::ZERO {
        return Err(ValidationError::AmountNotPositive);
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge);
    }

    Ok(amount)
}

/// Validates an optional tax id. Empty input is accepted.
pub fn validate_tax_id(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || has_national_format(value, TAX_ID_DIGITS) {
        Ok(())
    } else {
        Err(ValidationError::InvalidTaxId)
    }
}

/// Validates an optional bank account and returns it without whitespace.
///
/// Empty input is accepted and normalizes to an empty string.
pub fn validate_bank_account(value: &str) -> Result<String, ValidationError> {
    let cleaned: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() || has_national_format(&cleaned, BANK_ACCOUNT_DIGITS) {
        Ok(cleaned)
    } else {
        Err(ValidationError::InvalidBankAccount)
    }
}

/// Validates a `YYYY-MM` month key and returns its year and month.
pub fn validate_year_month(value: &str) -> Result<(i32, u32), ValidationError> {
    let invalid = || ValidationError::InvalidYearMonth(value.to_string());

    let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
    if year.len() != 4 || month.len() != 2 {
        return Err(invalid());
    }
    if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }

    Ok((year, month))
}

fn has_national_format(value: &str, digits: usize) -> bool {
    value.strip_prefix(COUNTRY_PREFIX).is_some_and(|rest| {
        rest.len() == digits && rest.bytes().all(|b| b.is_ascii_digit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
    }

    #[rstest]
    #[case("2024-05-01")]
    #[case(" 2024-01-01 ")]
    #[case("2024-12-31")]
    fn test_valid_dates(#[case] input: &str) {
        assert!(validate_date_on(input, 2024, false, today()).is_ok());
    }

    #[rstest]
    #[case("", ValidationError::DateRequired)]
    #[case("2024-13-01", ValidationError::InvalidDate("2024-13-01".to_string()))]
    #[case("yesterday", ValidationError::InvalidDate("yesterday".to_string()))]
    #[case("1999-05-01", ValidationError::DateTooOld(1999))]
    #[case("2023-05-01", ValidationError::YearMismatch { expected: 2024, actual: 2023 })]
    fn test_invalid_dates(#[case] input: &str, #[case] expected: ValidationError) {
        assert_eq!(validate_date_on(input, 2024, false, today()), Err(expected));
    }

    #[test]
    fn test_future_date() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(
            validate_date_on("2024-06-02", 2024, false, today),
            Err(ValidationError::FutureDate)
        );
        assert!(validate_date_on("2024-06-02", 2024, true, today).is_ok());
    }

    #[test]
    fn test_validate_date_against_clock() {
        assert!(validate_date("2024-05-01", 2024, false).is_ok());
        assert!(matches!(
            validate_date("2023-05-01", 2024, false),
            Err(ValidationError::YearMismatch { .. })
        ));
    }

    #[rstest]
    #[case("12.50", dec!(12.5))]
    #[case("1", dec!(1))]
    #[case(" 999.99 ", dec!(999.99))]
    #[case("1000000", dec!(1000000))]
    fn test_valid_amounts(#[case] input: &str, #[case] expected: Decimal) {
        assert_eq!(validate_amount(input), Ok(expected));
    }

    #[rstest]
    #[case("", ValidationError::AmountRequired)]
    #[case("abc", ValidationError::AmountNotNumeric("abc".to_string()))]
    #[case("-5", ValidationError::AmountNotPositive)]
    #[case("0", ValidationError::AmountNotPositive)]
    #[case("1000000.01", ValidationError::AmountTooLarge)]
    fn test_invalid_amounts(#[case] input: &str, #[case] expected: ValidationError) {
        assert_eq!(validate_amount(input), Err(expected));
    }

    #[rstest]
    #[case("")]
    #[case("SK1234567890")]
    fn test_valid_tax_ids(#[case] input: &str) {
        assert!(validate_tax_id(input).is_ok());
    }

    #[rstest]
    #[case("SK123456789")]
    #[case("CZ1234567890")]
    #[case("SK12345678901")]
    #[case("SK12345678AB")]
    fn test_invalid_tax_ids(#[case] input: &str) {
        assert_eq!(validate_tax_id(input), Err(ValidationError::InvalidTaxId));
    }

    #[test]
    fn test_bank_account_strips_whitespace() {
        let normalized = validate_bank_account("SK31 1200 0000 1987 4263 7541").unwrap();
        assert_eq!(normalized, "SK3112000000198742637541");
        assert_eq!(validate_bank_account("  "), Ok(String::new()));
    }

    #[rstest]
    #[case("SK31120000001987426375")]
    #[case("DE3112000000198742637541")]
    #[case("SK31120000001987426375AB")]
    fn test_invalid_bank_accounts(#[case] input: &str) {
        assert_eq!(
            validate_bank_account(input),
            Err(ValidationError::InvalidBankAccount)
        );
    }

    #[rstest]
    #[case("2025-01", (2025, 1))]
    #[case("2025-12", (2025, 12))]
    fn test_valid_year_months(#[case] input: &str, #[case] expected: (i32, u32)) {
        assert_eq!(validate_year_month(input), Ok(expected));
    }

    #[rstest]
    #[case("2025-13")]
    #[case("2025-00")]
    #[case("2025-1")]
    #[case("25-01")]
    #[case("2025/01")]
    #[case("")]
    fn test_invalid_year_months(#[case] input: &str) {
        assert!(validate_year_month(input).is_err());
    }
}
