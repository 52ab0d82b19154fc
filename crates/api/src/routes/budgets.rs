//! Monthly budget routes.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use taxbook_core::budget::{BudgetEntry, BudgetTotals};

use crate::{ApiError, AppState, middleware::AuthUser};

/// Creates the budget routes (auth applied by the caller).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets/{year_month}", get(get_budget).put(save_budget))
        .route("/budgets/{year_month}/copy", post(copy_budget))
}

/// Request body for saving budget lines.
#[derive(Debug, Deserialize)]
pub struct SaveBudgetRequest {
    /// Line name to amount, merged into the stored month.
    pub lines: BTreeMap<String, Decimal>,
}

/// Request body for copying a month.
#[derive(Debug, Deserialize)]
pub struct CopyBudgetRequest {
    /// Target months as `YYYY-MM`.
    pub targets: Vec<String>,
}

/// A budget month with its computed totals.
#[derive(Debug, Serialize)]
pub struct BudgetResponse {
    /// Stored entry.
    #[serde(flatten)]
    pub entry: BudgetEntry,
    /// Totals over the entry's lines.
    pub totals: BudgetTotals,
}

impl From<BudgetEntry> for BudgetResponse {
    fn from(entry: BudgetEntry) -> Self {
        Self {
            totals: entry.totals(),
            entry,
        }
    }
}

async fn get_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(year_month): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .repos
        .budgets
        .load(&auth.owner_id(), &year_month)
        .await?;
    Ok(Json(BudgetResponse::from(entry)))
}

async fn save_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(year_month): Path<String>,
    Json(body): Json<SaveBudgetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = auth.owner_id();
    let active_year = state.repos.years.active_year(&owner_id).await?;
    let entry = state
        .repos
        .budgets
        .save(&owner_id, &year_month, &body.lines, active_year)
        .await?;
    Ok(Json(BudgetResponse::from(entry)))
}

async fn copy_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(year_month): Path<String>,
    Json(body): Json<CopyBudgetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = auth.owner_id();
    let active_year = state.repos.years.active_year(&owner_id).await?;
    let copied = state
        .repos
        .budgets
        .copy_to_months(&owner_id, &year_month, &body.targets, active_year)
        .await?;
    Ok(Json(json!({ "copied": copied })))
}
