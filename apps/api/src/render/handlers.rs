use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::{catalog::DEFAULT_TEMPLATE_ID, render_by_id};
use crate::errors::AppError;
use crate::export::{content_disposition, export_pdf_blocking, PdfArtifact};
use crate::models::content::ResumeContent;
use crate::models::template::ResumeTemplate;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Shared with the resume routes
// ────────────────────────────────────────────────────────────────────────────

/// Renders `content` with the stored template `template_id`.
pub async fn render_with_store(
    state: &AppState,
    content: &ResumeContent,
    template_id: i32,
) -> Result<String, AppError> {
    let templates = state.store.list_templates().await?;
    Ok(render_by_id(content, template_id, &templates)?)
}

/// Renders and exports on the blocking pool.
pub async fn export_with_store(
    state: &AppState,
    content: &ResumeContent,
    template_id: i32,
    filename_hint: String,
) -> Result<PdfArtifact, AppError> {
    let markup = render_with_store(state, content, template_id).await?;
    Ok(export_pdf_blocking(state.config.export_scratch_dir.clone(), markup, filename_hint).await?)
}

pub fn pdf_response(artifact: PdfArtifact) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&artifact.filename),
            ),
        ],
        artifact.bytes,
    )
        .into_response()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeTemplate>>, AppError> {
    Ok(Json(state.store.list_templates().await?))
}

/// GET /api/templates/:id
pub async fn handle_get_template(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ResumeTemplate>, AppError> {
    state
        .store
        .get_template(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Template {id} not found")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRequest {
    pub content: ResumeContent,
    pub template_id: Option<i32>,
    pub name: Option<String>,
}

/// POST /api/render/preview
/// Renders an unsaved draft. Drafts are not validated; the editor previews
/// half-filled documents.
pub async fn handle_preview_draft(
    State(state): State<AppState>,
    Json(req): Json<DraftRequest>,
) -> Result<Html<String>, AppError> {
    let template_id = req.template_id.unwrap_or(DEFAULT_TEMPLATE_ID);
    Ok(Html(render_with_store(&state, &req.content, template_id).await?))
}

/// POST /api/render/pdf
pub async fn handle_export_draft(
    State(state): State<AppState>,
    Json(req): Json<DraftRequest>,
) -> Result<Response, AppError> {
    let template_id = req.template_id.unwrap_or(DEFAULT_TEMPLATE_ID);
    let hint = req.name.unwrap_or_else(|| req.content.full_name());
    let artifact = export_with_store(&state, &req.content, template_id, hint).await?;
    Ok(pdf_response(artifact))
}
