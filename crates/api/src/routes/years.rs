//! Year registry, closure and export routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use taxbook_core::budget::BudgetEntry;
use taxbook_core::reports::{ReportService, YearExport};

use taxbook_shared::AppError;

use crate::{ApiError, AppState, middleware::AuthUser};

/// Creates the year routes (auth applied by the caller).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/years", get(list_years))
        .route("/years/migrate", post(migrate))
        .route("/years/summaries", get(list_summaries))
        .route("/years/{year}", get(get_year))
        .route("/years/{year}/closure", get(validate_closure))
        .route("/years/{year}/close", post(close_year))
        .route("/years/{year}/unlock", post(unlock_year))
        .route("/years/{year}/export", get(export_year))
        .route("/years/{year}/summary", get(get_summary))
}

/// Year export with the year's budget months.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearExportResponse {
    /// Transactions and totals.
    #[serde(flatten)]
    pub export: YearExport,
    /// Stored budget months of the year.
    pub budgets: Vec<BudgetEntry>,
}

async fn migrate(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let active_year = state
        .repos
        .years
        .migrate_legacy_data(&auth.owner_id())
        .await?;
    Ok(Json(json!({ "activeYear": active_year })))
}

async fn list_years(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = auth.owner_id();
    let registry = state.repos.years.registry(&owner_id).await?;
    let reminder = state
        .repos
        .years
        .reminder(&owner_id, Utc::now().date_naive())
        .await?;
    Ok(Json(json!({
        "activeYear": registry.active_year,
        "years": registry.years(),
        "closureReminder": reminder,
    })))
}

/// Every stored closure summary, newest year first.
async fn list_summaries(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let summaries = state
        .repos
        .summaries
        .list_for_owner(&auth.owner_id())
        .await?;
    Ok(Json(json!({ "summaries": summaries })))
}

/// Latest closure summary of `year`.
async fn get_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(year): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .repos
        .summaries
        .find_for_year(&auth.owner_id(), year)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No closure summary for year {year}")))?;
    Ok(Json(summary))
}

async fn get_year(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(year): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .repos
        .years
        .switch_to_year(&auth.owner_id(), year)
        .await?;
    Ok(Json(view))
}

async fn validate_closure(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(year): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .repos
        .closure
        .validate_year_closure(&auth.owner_id(), year)
        .await?;
    Ok(Json(report))
}

async fn close_year(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(year): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .repos
        .closure
        .close_year(&auth.owner_id(), year)
        .await?;
    Ok(Json(outcome))
}

async fn unlock_year(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(year): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .repos
        .closure
        .unlock_year(&auth.owner_id(), year)
        .await?;
    Ok(Json(outcome))
}

async fn export_year(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(year): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = auth.owner_id();
    state.repos.years.switch_to_year(&owner_id, year).await?;

    let transactions = state
        .repos
        .transactions
        .list_for_year(&owner_id, year)
        .await?;
    let profile = state.repos.profiles.load(&owner_id).await?;
    let budgets = state.repos.budgets.load_months(&owner_id, year).await?;

    let export =
        ReportService::build_year_export(year, &transactions, profile.as_ref(), Utc::now());
    Ok(Json(YearExportResponse { export, budgets }))
}
