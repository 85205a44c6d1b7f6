//! Axum route handlers for the template editor.
//!
//! Each editor session owns one controller. Identifier switches release the
//! session lock while fetching so a newer switch can supersede an older one.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::customization::presets::{
    default_config, find_template, SpacingPreset, SpacingValues, TemplateInfo, TEMPLATES,
};
use crate::customization::sessions::SharedController;
use crate::customization::{
    ConfigField, ConfigPatch, ConfigState, ConfigValue, CustomizationController, TemplateConfig,
};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OpenSessionRequest {
    pub template_id: String,
    pub resume_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub state: ConfigState,
}

#[derive(Debug, Deserialize)]
pub struct IdentifiersRequest {
    pub template_id: String,
    pub resume_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFieldRequest {
    pub key: String,
    pub value: Value,
}

#[derive(Debug, Deserialize)]
pub struct BulkUpdateRequest {
    pub fields: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct SpacingPresetInfo {
    pub name: &'static str,
    pub values: SpacingValues,
}

fn validate_template(template_id: &str) -> Result<(), AppError> {
    find_template(template_id)
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("Template {template_id} not found")))
}

async fn session(state: &AppState, session_id: Uuid) -> Result<SharedController, AppError> {
    state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Editor session {session_id} not found")))
}

fn respond(session_id: Uuid, controller: &CustomizationController) -> Json<SessionResponse> {
    Json(SessionResponse {
        session_id,
        state: controller.state(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Template catalogue
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<&'static [TemplateInfo]> {
    Json(TEMPLATES)
}

/// GET /api/v1/templates/:template_id/defaults
pub async fn handle_template_defaults(
    Path(template_id): Path<String>,
) -> Result<Json<TemplateConfig>, AppError> {
    validate_template(&template_id)?;
    Ok(Json(default_config(&template_id)))
}

/// GET /api/v1/spacing-presets
pub async fn handle_spacing_presets() -> Json<Vec<SpacingPresetInfo>> {
    Json(
        SpacingPreset::ALL
            .into_iter()
            .map(|p| SpacingPresetInfo {
                name: p.name(),
                values: p.values(),
            })
            .collect(),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Editor sessions
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/customizations
///
/// Opens an editor session and loads the saved config for the resume.
pub async fn handle_open_session(
    State(state): State<AppState>,
    Json(req): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    validate_template(&req.template_id)?;

    let mut controller =
        CustomizationController::new(state.config_store.clone(), &req.template_id, req.resume_id);
    controller
        .on_identifier_changed(&req.template_id, req.resume_id)
        .await;

    let (session_id, shared) = state.sessions.open(controller).await;
    let controller = shared.lock().await;
    Ok((StatusCode::CREATED, respond(session_id, &controller)))
}

/// GET /api/v1/customizations/:session_id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let shared = session(&state, session_id).await?;
    let controller = shared.lock().await;
    Ok(respond(session_id, &controller))
}

/// DELETE /api/v1/customizations/:session_id
pub async fn handle_close_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.close(session_id).await {
        return Err(AppError::NotFound(format!(
            "Editor session {session_id} not found"
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/customizations/:session_id/identifiers
///
/// Switches template and/or resume. History restarts at the new template's
/// defaults; if another switch lands while this one is fetching, this one's
/// result is dropped. Edits sent during the fetch get 409.
pub async fn handle_switch_identifiers(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<IdentifiersRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    validate_template(&req.template_id)?;
    let shared = session(&state, session_id).await?;

    let (ticket, store) = {
        let mut controller = shared.lock().await;
        let ticket = controller.switch_identifiers(&req.template_id, req.resume_id);
        (ticket, controller.store())
    };

    // Runs detached so a dropped request cannot leave the session loading.
    let loader = Arc::clone(&shared);
    tokio::spawn(async move {
        let result = ticket.fetch(store.as_ref()).await;
        loader.lock().await.finish_load(ticket, result);
    })
    .await
    .map_err(|e| anyhow::anyhow!("Template config load task failed: {e}"))?;

    let controller = shared.lock().await;
    Ok(respond(session_id, &controller))
}

/// PATCH /api/v1/customizations/:session_id/field
pub async fn handle_update_field(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<UpdateFieldRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let field = ConfigField::parse(&req.key)?;
    let value = ConfigValue::from_json(&req.value)
        .ok_or_else(|| AppError::Validation(format!("Value for '{}' must be a scalar", req.key)))?;

    let shared = session(&state, session_id).await?;
    let mut controller = shared.lock().await;
    controller.update_field(field, value)?;
    Ok(respond(session_id, &controller))
}

/// PATCH /api/v1/customizations/:session_id
pub async fn handle_bulk_update(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<BulkUpdateRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let patch = ConfigPatch::from_json(&req.fields)?;

    let shared = session(&state, session_id).await?;
    let mut controller = shared.lock().await;
    controller.bulk_update(&patch)?;
    Ok(respond(session_id, &controller))
}

/// POST /api/v1/customizations/:session_id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let shared = session(&state, session_id).await?;
    let mut controller = shared.lock().await;
    controller.reset_to_defaults()?;
    Ok(respond(session_id, &controller))
}

/// POST /api/v1/customizations/:session_id/undo
pub async fn handle_undo(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let shared = session(&state, session_id).await?;
    let mut controller = shared.lock().await;
    controller.undo();
    Ok(respond(session_id, &controller))
}

/// POST /api/v1/customizations/:session_id/redo
pub async fn handle_redo(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let shared = session(&state, session_id).await?;
    let mut controller = shared.lock().await;
    controller.redo();
    Ok(respond(session_id, &controller))
}

/// POST /api/v1/customizations/:session_id/save
///
/// A failed save leaves config and history as they were; the client decides
/// how to tell the user.
pub async fn handle_save(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let shared = session(&state, session_id).await?;
    let controller = shared.lock().await;
    controller.save().await?;
    Ok(respond(session_id, &controller))
}
