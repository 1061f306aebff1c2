use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::{
    ensure_template_exists, load_authorized, prepare_content, save_content, validate_resume_name,
};
use crate::editor::{self, Entry};
use crate::errors::AppError;
use crate::models::content::{PersonalField, ResumeContent, SectionKind};
use crate::models::resume::{NewResume, Resume, ResumePatch};
use crate::models::user::User;
use crate::render::handlers::{export_with_store, pdf_response, render_with_store};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResumeRequest {
    pub name: Option<String>,
    pub template_id: Option<i32>,
    pub content: Option<ResumeContent>,
}

#[derive(Debug, Deserialize)]
pub struct PersonalFieldRequest {
    pub value: Option<String>,
}

fn section_from_path(name: &str) -> Result<SectionKind, AppError> {
    SectionKind::from_name(name)
        .ok_or_else(|| AppError::NotFound(format!("Unknown section '{name}'")))
}

// ────────────────────────────────────────────────────────────────────────────
// CRUD
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Resume>>, AppError> {
    Ok(Json(state.store.list_resumes_by_owner(user.id).await?))
}

/// POST /api/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(req): Json<CreateResumeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(name), Some(template_id), Some(content)) = (req.name, req.template_id, req.content)
    else {
        return Err(AppError::Validation("Missing required fields".to_string()));
    };
    validate_resume_name(&name)?;
    ensure_template_exists(&state, template_id).await?;

    let resume = state
        .store
        .create_resume(NewResume {
            name: name.trim().to_string(),
            owner_id: user.id,
            template_id,
            content: prepare_content(content)?,
        })
        .await?;
    info!("Created resume {} for user {}", resume.id, user.id);

    Ok((StatusCode::CREATED, Json(resume)))
}

/// GET /api/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(load_authorized(&state, &user, id).await?))
}

/// PUT /api/resumes/:id
/// Partial: absent fields keep their stored value.
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(mut patch): Json<ResumePatch>,
) -> Result<Json<Resume>, AppError> {
    load_authorized(&state, &user, id).await?;

    if let Some(name) = patch.name.take() {
        validate_resume_name(&name)?;
        patch.name = Some(name.trim().to_string());
    }
    if let Some(template_id) = patch.template_id {
        ensure_template_exists(&state, template_id).await?;
    }
    if let Some(content) = patch.content.take() {
        patch.content = Some(prepare_content(content)?);
    }

    state
        .store
        .update_resume(id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))
}

/// DELETE /api/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    load_authorized(&state, &user, id).await?;
    state.store.delete_resume(id).await?;
    info!("Deleted resume {id}");
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Entry editing
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/resumes/:id/entries/:section
/// The server assigns the new entry's id.
pub async fn handle_add_entry(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path((id, section)): Path<(Uuid, String)>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let section = section_from_path(&section)?;
    let mut content = load_authorized(&state, &user, id).await?.content;

    let entry = Entry::from_value(section, body)?;
    editor::add_entry(&mut content, entry);

    Ok((StatusCode::CREATED, Json(save_content(&state, id, content).await?)))
}

/// PUT /api/resumes/:id/entries/:section/:entry_id
pub async fn handle_update_entry(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path((id, section, entry_id)): Path<(Uuid, String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Resume>, AppError> {
    let section = section_from_path(&section)?;
    let mut content = load_authorized(&state, &user, id).await?.content;

    let entry = Entry::from_value(section, body)?;
    editor::update_entry(&mut content, &entry_id, entry)?;

    Ok(Json(save_content(&state, id, content).await?))
}

/// DELETE /api/resumes/:id/entries/:section/:entry_id
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path((id, section, entry_id)): Path<(Uuid, String, String)>,
) -> Result<Json<Resume>, AppError> {
    let section = section_from_path(&section)?;
    let mut content = load_authorized(&state, &user, id).await?.content;

    editor::remove_entry(&mut content, section, &entry_id)?;

    Ok(Json(save_content(&state, id, content).await?))
}

/// PUT /api/resumes/:id/personal/:field
/// A null or empty value clears an optional field.
pub async fn handle_set_personal_field(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path((id, field)): Path<(Uuid, String)>,
    Json(req): Json<PersonalFieldRequest>,
) -> Result<Json<Resume>, AppError> {
    let field = PersonalField::from_name(&field)
        .ok_or_else(|| AppError::NotFound(format!("Unknown personal info field '{field}'")))?;
    let mut content = load_authorized(&state, &user, id).await?.content;

    let value = req.value.filter(|v| !v.trim().is_empty());
    editor::set_personal_field(&mut content, field, value);

    Ok(Json(save_content(&state, id, content).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/resumes/:id/preview
pub async fn handle_preview_resume(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let resume = load_authorized(&state, &user, id).await?;
    Ok(Html(
        render_with_store(&state, &resume.content, resume.template_id).await?,
    ))
}

/// GET /api/resumes/:id/pdf
pub async fn handle_download_resume(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let resume = load_authorized(&state, &user, id).await?;
    let artifact =
        export_with_store(&state, &resume.content, resume.template_id, resume.name).await?;
    info!(
        "Exported resume {} ({} pages, {} bytes)",
        id,
        artifact.page_count,
        artifact.bytes.len()
    );
    Ok(pdf_response(artifact))
}
