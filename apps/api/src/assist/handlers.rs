//! Axum route handlers for AI assist.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assist::prompts::{build_prompt, AssistKind};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssistRequest {
    pub kind: AssistKind,
    pub content: String,
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AssistResponse {
    pub text: String,
    pub model: String,
}

/// POST /api/v1/assist/generate
///
/// Forwards the request to the AI provider and returns its text unchanged
/// apart from fence stripping.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<AssistRequest>,
) -> Result<Json<AssistResponse>, AppError> {
    let prompt = build_prompt(
        request.kind,
        &request.content,
        request.job_description.as_deref(),
    )?;

    info!("AI assist request: {:?}", request.kind);
    let text = state.ai.generate_text(&prompt.user, &prompt.system).await?;

    Ok(Json(AssistResponse {
        text,
        model: state.ai.model().to_string(),
    }))
}
