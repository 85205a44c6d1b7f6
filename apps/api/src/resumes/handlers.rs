//! Axum route handlers for resume records and share links.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::customization::presets::{find_template, FALLBACK_TEMPLATE};
use crate::errors::AppError;
use crate::models::resume::{PublicResume, ResumeRow};
use crate::resumes::repository::{self, NewResume, ResumeChanges};
use crate::resumes::sharing::{generate_slug, is_valid_slug, share_url};
use crate::state::AppState;

const MAX_TITLE_CHARS: usize = 200;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CreateResumeRequest {
    pub user_id: Uuid,
    pub title: String,
    pub template_id: Option<String>,
    #[serde(default)]
    pub content: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateResumeRequest {
    pub title: Option<String>,
    pub template_id: Option<String>,
    pub content: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub resume_id: Uuid,
    pub slug: String,
    pub url: String,
}

fn validate_title(title: &str) -> Result<&str, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::Validation(format!(
            "title exceeds {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(title)
}

fn validate_template(template_id: &str) -> Result<&str, AppError> {
    find_template(template_id)
        .map(|t| t.id)
        .ok_or_else(|| AppError::Validation(format!("Unknown template '{template_id}'")))
}

fn validate_content(content: &Value) -> Result<(), AppError> {
    if content.is_object() {
        Ok(())
    } else {
        Err(AppError::Validation("content must be a JSON object".to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(req): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    let title = validate_title(&req.title)?;
    let template_id = validate_template(req.template_id.as_deref().unwrap_or(FALLBACK_TEMPLATE))?;
    let content = req.content.unwrap_or_else(|| Value::Object(Default::default()));
    validate_content(&content)?;

    repository::find_user(&state.db, req.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", req.user_id)))?;

    let row = repository::create_resume(
        &state.db,
        NewResume {
            user_id: req.user_id,
            title,
            template_id,
            content: &content,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/resumes?user_id=
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    Ok(Json(repository::list_resumes(&state.db, params.user_id).await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    let row = repository::get_resume(&state.db, resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;
    Ok(Json(row))
}

/// PUT /api/v1/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(req): Json<UpdateResumeRequest>,
) -> Result<Json<ResumeRow>, AppError> {
    let title = req.title.as_deref().map(validate_title).transpose()?;
    let template_id = req.template_id.as_deref().map(validate_template).transpose()?;
    if let Some(content) = &req.content {
        validate_content(content)?;
    }

    let row = repository::update_resume(
        &state.db,
        resume_id,
        ResumeChanges {
            title,
            template_id,
            content: req.content.as_ref(),
        },
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    Ok(Json(row))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !repository::delete_resume(&state.db, resume_id).await? {
        return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/resumes/:id/share
pub async fn handle_enable_sharing(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ShareResponse>, AppError> {
    let row = repository::enable_sharing(&state.db, resume_id, &generate_slug())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    let slug = row
        .share_slug
        .ok_or_else(|| anyhow::anyhow!("Resume {resume_id} has no slug after sharing"))?;
    let url = share_url(&state.config.public_base_url, &slug);

    Ok(Json(ShareResponse {
        resume_id,
        slug,
        url,
    }))
}

/// DELETE /api/v1/resumes/:id/share
pub async fn handle_disable_sharing(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !repository::disable_sharing(&state.db, resume_id).await? {
        return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/public/:slug
pub async fn handle_get_public_resume(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PublicResume>, AppError> {
    if !is_valid_slug(&slug) {
        return Err(AppError::NotFound("Shared resume not found".to_string()));
    }
    let row = repository::get_public_resume(&state.db, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Shared resume not found".to_string()))?;
    Ok(Json(row.into()))
}
