//! Core business logic for Taxbook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `transaction` - Transaction model and category classification
//! - `tax` - Tax statistics aggregation
//! - `validation` - Input validators
//! - `year` - Year registry, closure state machine and closure checks
//! - `budget` - Monthly budget entries
//! - `reports` - Filtering, breakdowns and year export
//! - `payroll` - Salary deductions
//! - `profile` - User profile fields
//! - `session` - Session state and refresh gating

pub mod budget;
pub mod payroll;
pub mod profile;
pub mod reports;
pub mod session;
pub mod tax;
pub mod transaction;
pub mod validation;
pub mod year;
