//! Persistence gateway.
//!
//! `Store` is the port handlers talk to; `PgStore` is the PostgreSQL adapter.
//! Ownership and admin checks happen at the HTTP boundary, not here. A missing
//! row is `Ok(None)` (or `false` for deletes) so callers decide what "not
//! found" means.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::api_key::{ApiKey, ApiKeyPatch, NewApiKey};
use crate::models::resume::{NewResume, Resume, ResumePatch};
use crate::models::template::{NewTemplate, ResumeTemplate};
use crate::models::user::{NewUser, User, UserCredentials};

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique constraint was violated; the message names what collided.
    #[error("{0}")]
    Conflict(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    // --- Resumes ---
    async fn create_resume(&self, new: NewResume) -> StoreResult<Resume>;

    async fn get_resume(&self, id: Uuid) -> StoreResult<Option<Resume>>;

    /// Most recently updated first.
    async fn list_resumes_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Resume>>;

    async fn list_all_resumes(&self) -> StoreResult<Vec<Resume>>;

    /// Applies the present fields of `patch`. `updated_at` always moves
    /// strictly forward, even when the patch is empty.
    async fn update_resume(&self, id: Uuid, patch: ResumePatch) -> StoreResult<Option<Resume>>;

    async fn delete_resume(&self, id: Uuid) -> StoreResult<bool>;

    // --- Templates ---
    async fn list_templates(&self) -> StoreResult<Vec<ResumeTemplate>>;

    async fn get_template(&self, id: i32) -> StoreResult<Option<ResumeTemplate>>;

    /// Inserts templates whose id is not taken yet. Returns how many were added.
    async fn seed_templates(&self, templates: Vec<NewTemplate>) -> StoreResult<usize>;

    // --- Users and auth sessions ---
    async fn create_user(&self, new: NewUser) -> StoreResult<User>;

    async fn get_user_credentials_by_username(
        &self,
        username: &str,
    ) -> StoreResult<Option<UserCredentials>>;

    async fn list_users(&self) -> StoreResult<Vec<User>>;

    /// Also removes the user's resumes and sessions.
    async fn delete_user(&self, id: Uuid) -> StoreResult<bool>;

    async fn create_session(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<()>;

    /// The user behind an unexpired session.
    async fn resolve_session(&self, token: &str) -> StoreResult<Option<User>>;

    async fn delete_session(&self, token: &str) -> StoreResult<()>;

    // --- API keys ---
    async fn create_api_key(&self, new: NewApiKey) -> StoreResult<ApiKey>;

    /// The most recently updated active key for `provider`.
    async fn get_active_api_key(&self, provider: &str) -> StoreResult<Option<ApiKey>>;

    async fn list_api_keys(&self) -> StoreResult<Vec<ApiKey>>;

    async fn update_api_key(&self, id: Uuid, patch: ApiKeyPatch) -> StoreResult<Option<ApiKey>>;

    async fn delete_api_key(&self, id: Uuid) -> StoreResult<bool>;
}
