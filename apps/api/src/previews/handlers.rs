use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::customization::presets::find_template;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecordPreviewRequest {
    pub template_id: String,
}

#[derive(Debug, Serialize)]
pub struct RecordPreviewResponse {
    pub template_id: String,
    pub first_preview: bool,
}

#[derive(Debug, Serialize)]
pub struct PreviewListResponse {
    pub resume_id: Uuid,
    pub template_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PreviewCheckResponse {
    pub template_id: String,
    pub previewed: bool,
}

/// POST /api/v1/resumes/:id/previews
pub async fn handle_record_preview(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(req): Json<RecordPreviewRequest>,
) -> Result<Json<RecordPreviewResponse>, AppError> {
    if find_template(&req.template_id).is_none() {
        return Err(AppError::NotFound(format!(
            "Template {} not found",
            req.template_id
        )));
    }
    let first_preview = state.previews.add(resume_id, &req.template_id).await?;
    Ok(Json(RecordPreviewResponse {
        template_id: req.template_id,
        first_preview,
    }))
}

/// GET /api/v1/resumes/:id/previews
pub async fn handle_list_previews(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<PreviewListResponse>, AppError> {
    let template_ids = state.previews.list(resume_id).await?;
    Ok(Json(PreviewListResponse {
        resume_id,
        template_ids,
    }))
}

/// GET /api/v1/resumes/:id/previews/:template_id
pub async fn handle_check_preview(
    State(state): State<AppState>,
    Path((resume_id, template_id)): Path<(Uuid, String)>,
) -> Result<Json<PreviewCheckResponse>, AppError> {
    let previewed = state.previews.contains(resume_id, &template_id).await?;
    Ok(Json(PreviewCheckResponse {
        template_id,
        previewed,
    }))
}
