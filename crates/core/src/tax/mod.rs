//! Tax statistics aggregation.
//!
//! Turns a year's transactions into the figures needed for the annual
//! return: subtotals per tax bucket, the rental income exemption with
//! proportional expense deduction, the combined tax base and the balance
//! against advances already paid.

pub mod aggregator;
pub mod types;

#[cfg(test)]
mod aggregator_props;

pub use aggregator::TaxAggregator;
pub use types::{Settlement, TaxConfig, TaxStats};
