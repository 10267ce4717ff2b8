//! Crop diagnosis API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::diagnosis::{DiagnosisEvent, DiagnosisSession, DIAGNOSIS_CROPS};
use crate::errors::AppError;
use crate::models::DiagnosisResult;
use crate::AppState;

/// A session together with the id the frontend uses to address it.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: String,
    #[serde(flatten)]
    pub session: DiagnosisSession,
}

#[derive(Debug, Deserialize)]
pub struct SelectCropRequest {
    pub crop: String,
}

/// Image from the camera, the gallery, or handed over by the chat view.
#[derive(Debug, Deserialize)]
pub struct SelectImageRequest {
    pub image: String,
}

/// GET /api/diagnosis/crops - Crop selector options.
pub async fn list_diagnosis_crops() -> ApiResult<&'static [&'static str]> {
    success(DIAGNOSIS_CROPS)
}

/// POST /api/diagnosis/sessions - Open a diagnosis screen.
pub async fn open_session(State(state): State<AppState>) -> ApiResult<SessionView> {
    let (id, session) = state.diagnosis.open_session().await;
    success(SessionView { id, session })
}

/// GET /api/diagnosis/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SessionView> {
    let session = state.diagnosis.get_session(&id).await?;
    success(SessionView { id, session })
}

/// PUT /api/diagnosis/sessions/{id}/crop
pub async fn select_crop(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SelectCropRequest>,
) -> ApiResult<SessionView> {
    let session = state
        .diagnosis
        .apply(&id, DiagnosisEvent::CropSelected(request.crop))
        .await?;
    success(SessionView { id, session })
}

/// PUT /api/diagnosis/sessions/{id}/image
pub async fn select_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SelectImageRequest>,
) -> ApiResult<SessionView> {
    let session = state
        .diagnosis
        .apply(&id, DiagnosisEvent::ImageSelected(request.image))
        .await?;
    success(SessionView { id, session })
}

/// DELETE /api/diagnosis/sessions/{id}/image
pub async fn clear_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SessionView> {
    let session = state
        .diagnosis
        .apply(&id, DiagnosisEvent::ImageCleared)
        .await?;
    success(SessionView { id, session })
}

/// POST /api/diagnosis/sessions/{id}/analyze - Run the analysis; resolves when it completes.
pub async fn analyze(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DiagnosisResult> {
    // Detached so a dropped request cannot leave the session stuck in analyzing.
    let flow = state.diagnosis.clone();
    let task = tokio::spawn(async move { flow.analyze(&id).await });

    let result = task
        .await
        .map_err(|e| AppError::Internal(format!("Analysis task failed: {}", e)))??;
    success(result)
}

/// DELETE /api/diagnosis/sessions/{id} - Close the screen, cancelling any running analysis.
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.diagnosis.close_session(&id).await?;
    success(())
}
