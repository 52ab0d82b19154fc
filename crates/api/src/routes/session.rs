//! Session routes: which year the owner is looking at.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde::{Deserialize, Serialize};
use taxbook_core::session::Session;

use crate::{ApiError, AppState, middleware::AuthUser};

/// Creates the session routes (auth applied by the caller).
pub fn routes() -> Router<AppState> {
    Router::new().route("/session", get(get_session).put(view_year))
}

/// Request body selecting the viewed year.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewYearRequest {
    /// Active or archived year to display.
    pub viewed_year: i32,
}

/// Session with derived flags.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Owner, active year and viewed year.
    #[serde(flatten)]
    pub session: Session,
    /// True when the viewed year cannot be edited.
    pub read_only: bool,
    /// True while a migration, closure or unlock runs for the owner.
    pub operation_in_progress: bool,
}

fn respond(state: &AppState, session: Session) -> Json<SessionResponse> {
    let operation_in_progress = state.repos.guard.is_busy(&session.owner_id);
    Json(SessionResponse {
        read_only: session.is_read_only(),
        operation_in_progress,
        session,
    })
}

async fn get_session(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .sessions
        .refresh(&auth.owner_id(), &state.repos.years)
        .await?;
    Ok(respond(&state, session))
}

async fn view_year(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ViewYearRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .sessions
        .view_year(&auth.owner_id(), request.viewed_year, &state.repos.years)
        .await?;
    Ok(respond(&state, session))
}
