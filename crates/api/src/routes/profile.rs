//! Profile routes.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde_json::json;
use taxbook_core::profile::UserProfile;
use tracing::info;

use crate::{ApiError, AppState, middleware::AuthUser};

/// Creates the profile routes (auth applied by the caller).
pub fn routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

/// Profile fields and the year registry. A missing profile is `null`.
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = auth.owner_id();
    let profile = state.repos.profiles.load(&owner_id).await?;
    let registry = state.repos.years.registry(&owner_id).await?;
    Ok(Json(json!({ "profile": profile, "registry": registry })))
}

async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(profile): Json<UserProfile>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = auth.owner_id();
    let saved = state.repos.profiles.save_profile(&owner_id, profile).await?;
    info!(owner_id = %owner_id, "Profile updated via API");
    Ok(Json(saved))
}
