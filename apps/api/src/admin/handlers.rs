use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::{validate_key_name, validate_key_provider, validate_key_secret};
use crate::errors::AppError;
use crate::models::api_key::{ApiKeyPatch, ApiKeyView, NewApiKey};
use crate::models::resume::Resume;
use crate::models::user::User;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Users
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/admin/users
pub async fn handle_list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.store.list_users().await?))
}

/// DELETE /api/admin/users/:id
/// Removes the user's resumes and sessions too.
pub async fn handle_delete_user(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if id == admin.id {
        return Err(AppError::Validation(
            "Cannot delete your own account".to_string(),
        ));
    }
    if !state.store.delete_user(id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    info!("Admin {} deleted user {}", admin.id, id);
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Resumes
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/admin/resumes
pub async fn handle_list_all_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<Resume>>, AppError> {
    Ok(Json(state.store.list_all_resumes().await?))
}

/// DELETE /api/admin/resumes/:id
pub async fn handle_delete_any_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_resume(id).await? {
        return Err(AppError::NotFound("Resume not found".to_string()));
    }
    info!("Admin deleted resume {id}");
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// API keys
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateApiKeyRequest {
    pub name: Option<String>,
    pub key: Option<String>,
    pub provider: Option<String>,
}

/// GET /api/admin/api-keys
pub async fn handle_list_api_keys(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApiKeyView>>, AppError> {
    let keys = state.store.list_api_keys().await?;
    Ok(Json(keys.into_iter().map(ApiKeyView::from).collect()))
}

/// POST /api/admin/api-keys
/// New keys start active.
pub async fn handle_create_api_key(
    State(state): State<AppState>,
    Json(req): Json<CreateApiKeyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(name), Some(key), Some(provider)) = (req.name, req.key, req.provider) else {
        return Err(AppError::Validation("Missing required fields".to_string()));
    };
    validate_key_name(&name)?;
    validate_key_secret(&key)?;
    validate_key_provider(&provider)?;

    let created = state
        .store
        .create_api_key(NewApiKey {
            name: name.trim().to_string(),
            key: key.trim().to_string(),
            provider: provider.trim().to_lowercase(),
            is_active: true,
        })
        .await?;
    info!("Created API key {} for provider {}", created.id, created.provider);

    Ok((StatusCode::CREATED, Json(ApiKeyView::from(created))))
}

/// PUT /api/admin/api-keys/:id
pub async fn handle_update_api_key(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut patch): Json<ApiKeyPatch>,
) -> Result<Json<ApiKeyView>, AppError> {
    if let Some(name) = patch.name.take() {
        validate_key_name(&name)?;
        patch.name = Some(name.trim().to_string());
    }
    if let Some(key) = patch.key.take() {
        validate_key_secret(&key)?;
        patch.key = Some(key.trim().to_string());
    }
    if let Some(provider) = patch.provider.take() {
        validate_key_provider(&provider)?;
        patch.provider = Some(provider.trim().to_lowercase());
    }

    state
        .store
        .update_api_key(id, patch)
        .await?
        .map(|key| Json(ApiKeyView::from(key)))
        .ok_or_else(|| AppError::NotFound("API key not found".to_string()))
}

/// DELETE /api/admin/api-keys/:id
pub async fn handle_delete_api_key(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_api_key(id).await? {
        return Err(AppError::NotFound("API key not found".to_string()));
    }
    info!("Deleted API key {id}");
    Ok(StatusCode::NO_CONTENT)
}
