//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST routes over the taxbook repositories
//! - Per-owner session state (active and viewed year)
//! - Bearer token authentication middleware
//! - Mapping of domain errors to JSON error responses

pub mod error;
pub mod middleware;
pub mod routes;
pub mod session;

use std::sync::Arc;

use axum::Router;
use taxbook_core::payroll::PayrollRates;
use taxbook_db::{Repositories, SharedStore};
use taxbook_shared::{JwtService, TaxDefaults};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use session::SessionStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repositories over the configured document store.
    pub repos: Repositories,
    /// JWT service for token verification.
    pub jwt_service: Arc<JwtService>,
    /// Tax policy defaults for owners without profile values.
    pub tax: TaxDefaults,
    /// Rates used to generate salary deductions.
    pub payroll: PayrollRates,
    /// Active and viewed year per owner.
    pub sessions: SessionStore,
}

impl AppState {
    /// Builds the state for `store`.
    #[must_use]
    pub fn new(store: SharedStore, jwt_service: JwtService, tax: TaxDefaults) -> Self {
        Self {
            repos: Repositories::new(store, &tax),
            jwt_service: Arc::new(jwt_service),
            tax,
            payroll: PayrollRates::default(),
            sessions: SessionStore::new(),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
