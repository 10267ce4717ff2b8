//! Profile and session API endpoints.

use axum::{extract::State, Json};

use super::{success, ApiResult};
use crate::models::UserProfile;
use crate::AppState;

/// GET /api/profile - Stored profile, or null before onboarding.
pub async fn get_profile(State(state): State<AppState>) -> ApiResult<Option<UserProfile>> {
    success(state.store.profile.get_profile().await)
}

/// PUT /api/profile - Complete onboarding.
pub async fn save_profile(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> ApiResult<UserProfile> {
    profile.validate()?;

    state.store.profile.save_profile(&profile).await?;
    tracing::info!("Profile saved for {}", profile.name);
    success(profile)
}

/// POST /api/logout - Close every diagnosis session, then wipe the local store.
pub async fn logout(State(state): State<AppState>) -> ApiResult<()> {
    state.diagnosis.close_all().await;
    state.store.logout().await?;
    success(())
}
