//! Report routes: tax statistics and filtered breakdowns.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use taxbook_core::reports::{
    CategoryTotal, MonthlyTotals, ReportFilter, ReportService, ReportSummary,
};
use taxbook_core::tax::{Settlement, TaxAggregator, TaxConfig, TaxStats};
use taxbook_core::transaction::Transaction;

use super::year_or_viewed;
use crate::{ApiError, AppState, middleware::AuthUser};

/// Creates the report routes (auth applied by the caller).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/tax", get(tax_report))
        .route("/reports/query", post(query_report))
}

/// Query parameters selecting a year.
#[derive(Debug, Default, Deserialize)]
pub struct YearQuery {
    /// Year to report on; the viewed year when omitted.
    pub year: Option<i32>,
}

/// Tax statistics of one year.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxReportResponse {
    /// Reported year.
    pub year: i32,
    /// Parameters used.
    pub config: TaxConfig,
    /// Aggregated figures.
    pub stats: TaxStats,
    /// Whether tax is owed or refunded.
    pub settlement: Settlement,
}

/// Body of a report query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    /// Year to query; the viewed year when omitted.
    #[serde(default)]
    pub year: Option<i32>,
    /// Filter criteria.
    #[serde(flatten)]
    pub filter: ReportFilter,
}

/// Filtered transactions with their breakdowns.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    /// Queried year.
    pub year: i32,
    /// Totals over the matches.
    pub summary: ReportSummary,
    /// Income and expenses per month.
    pub monthly: Vec<MonthlyTotals>,
    /// Expenses per category, largest first.
    pub expenses: Vec<CategoryTotal>,
    /// Matching transactions, oldest first.
    pub transactions: Vec<Transaction>,
}

async fn tax_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<YearQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = auth.owner_id();
    let year = year_or_viewed(&state, &owner_id, query.year).await?;
    let transactions = state
        .repos
        .transactions
        .list_for_year(&owner_id, year)
        .await?;
    let config = state
        .repos
        .profiles
        .tax_config(&owner_id, &state.tax)
        .await?;

    let stats = TaxAggregator::aggregate(&transactions, &config);
    Ok(Json(TaxReportResponse {
        year,
        config,
        settlement: stats.settlement(),
        stats,
    }))
}

async fn query_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(query): Json<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = auth.owner_id();
    let year = year_or_viewed(&state, &owner_id, query.year).await?;
    let all = state
        .repos
        .transactions
        .list_for_year(&owner_id, year)
        .await?;

    let transactions = ReportService::filter_transactions(&all, &query.filter);
    Ok(Json(ReportResponse {
        year,
        summary: ReportService::summarize(&transactions),
        monthly: ReportService::monthly_breakdown(&transactions),
        expenses: ReportService::expense_breakdown(&transactions),
        transactions,
    }))
}
