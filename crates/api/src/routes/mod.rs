//! API route definitions.

use axum::{Router, middleware};
use taxbook_shared::types::OwnerId;

use crate::{ApiError, AppState, middleware::auth_middleware};

pub mod budgets;
pub mod health;
pub mod profile;
pub mod reports;
pub mod session;
pub mod transactions;
pub mod years;

/// Creates the API router; everything except health requires a bearer token.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(profile::routes())
        .merge(years::routes())
        .merge(transactions::routes())
        .merge(budgets::routes())
        .merge(reports::routes())
        .merge(session::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}

/// Resolves `year`, defaulting to the year the owner's session is viewing.
async fn year_or_viewed(
    state: &AppState,
    owner_id: &OwnerId,
    year: Option<i32>,
) -> Result<i32, ApiError> {
    match year {
        Some(year) => Ok(year),
        None => Ok(state
            .sessions
            .refresh(owner_id, &state.repos.years)
            .await?
            .viewed_year),
    }
}
