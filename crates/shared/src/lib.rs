//! Shared types, errors, and configuration for Taxbook.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for owners and stored documents
//! - Application-wide error types
//! - Configuration management
//! - Bearer token verification for the external auth service

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::{AppConfig, StoreBackend, TaxDefaults};
pub use error::{AppError, AppResult};
pub use jwt::{JwtError, JwtService};
