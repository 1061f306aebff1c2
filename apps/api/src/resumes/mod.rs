//! Saved resumes: CRUD, per-entry editing, preview and PDF download.
//!
//! Every route loads the resume first and checks owner-or-admin before doing
//! anything else. Content is normalized and validated before it is persisted.

pub mod handlers;

use uuid::Uuid;

use crate::auth::authorize_owner;
use crate::editor::validation::{has_min_len, validate_content};
use crate::errors::AppError;
use crate::models::content::ResumeContent;
use crate::models::resume::{Resume, ResumePatch};
use crate::models::user::User;
use crate::state::AppState;

pub fn validate_resume_name(name: &str) -> Result<(), AppError> {
    if has_min_len(name, 2) {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Resume name must be at least 2 characters".to_string(),
        ))
    }
}

/// Assigns missing entry ids, then runs the content checks.
pub fn prepare_content(content: ResumeContent) -> Result<ResumeContent, AppError> {
    let content = content.normalize();
    validate_content(&content)?;
    Ok(content)
}

pub async fn ensure_template_exists(state: &AppState, template_id: i32) -> Result<(), AppError> {
    match state.store.get_template(template_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound(format!("Template {template_id} not found"))),
    }
}

/// Loads a resume the caller may act on: 404 when missing, 403 when it
/// belongs to someone else and the caller is not an admin.
pub async fn load_authorized(state: &AppState, user: &User, id: Uuid) -> Result<Resume, AppError> {
    let resume = state
        .store
        .get_resume(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;
    authorize_owner(user, resume.owner_id)?;
    Ok(resume)
}

/// Validates and stores a whole new document for `id`.
pub async fn save_content(
    state: &AppState,
    id: Uuid,
    content: ResumeContent,
) -> Result<Resume, AppError> {
    let patch = ResumePatch {
        content: Some(prepare_content(content)?),
        ..Default::default()
    };
    state
        .store
        .update_resume(id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))
}
