//! Transaction routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use taxbook_core::transaction::TransactionDraft;

use super::year_or_viewed;
use crate::{ApiError, AppState, middleware::AuthUser};

/// Creates the transaction routes (auth applied by the caller).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/transactions/salary", post(create_salary))
        .route(
            "/transactions/{id}",
            put(update_transaction).delete(delete_transaction),
        )
}

/// Query parameters for listing transactions.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Year to list; the viewed year when omitted.
    pub year: Option<i32>,
}

async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = auth.owner_id();
    let year = year_or_viewed(&state, &owner_id, query.year).await?;
    let transactions = state
        .repos
        .transactions
        .list_for_year(&owner_id, year)
        .await?;
    Ok(Json(json!({ "year": year, "transactions": transactions })))
}

async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(draft): Json<TransactionDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = auth.owner_id();
    let active_year = state.repos.years.active_year(&owner_id).await?;
    let created = state
        .repos
        .transactions
        .create(&owner_id, draft, active_year)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn create_salary(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(draft): Json<TransactionDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = auth.owner_id();
    let active_year = state.repos.years.active_year(&owner_id).await?;
    let created = state
        .repos
        .transactions
        .create_salary_with_deductions(&owner_id, draft, active_year, &state.payroll)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "transactions": created }))))
}

async fn update_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(draft): Json<TransactionDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = auth.owner_id();
    let active_year = state.repos.years.active_year(&owner_id).await?;
    let updated = state
        .repos
        .transactions
        .update(&owner_id, &id, draft, active_year)
        .await?;
    Ok(Json(updated))
}

async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = auth.owner_id();
    let active_year = state.repos.years.active_year(&owner_id).await?;
    state
        .repos
        .transactions
        .delete(&owner_id, &id, active_year)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
