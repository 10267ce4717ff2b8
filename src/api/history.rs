//! Activity history API endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::{success, ApiResult};
use crate::models::{ActivityType, CreateHistoryRequest, HistoryEntry};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(rename = "type", default)]
    pub activity_type: Option<ActivityType>,
}

/// GET /api/history - Entries newest first, optionally of one type.
pub async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Vec<HistoryEntry>> {
    let entries = match query.activity_type {
        Some(activity_type) => state.store.history.get_history_by_type(activity_type).await,
        None => state.store.history.get_history().await,
    };
    success(entries)
}

/// POST /api/history - Record an activity completed in the frontend.
pub async fn create_history_entry(
    State(state): State<AppState>,
    Json(request): Json<CreateHistoryRequest>,
) -> ApiResult<HistoryEntry> {
    let entry = request.into_entry();
    state.store.history.save_to_history(entry.clone()).await?;
    success(entry)
}

/// DELETE /api/history - Clear all history.
pub async fn clear_history(State(state): State<AppState>) -> ApiResult<()> {
    state.store.history.clear_history().await?;
    tracing::info!("History cleared");
    success(())
}
