//! PostgreSQL adapter for the `Store` port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::api_key::{ApiKey, ApiKeyPatch, NewApiKey};
use crate::models::content::ResumeContent;
use crate::models::resume::{NewResume, Resume, ResumePatch};
use crate::models::template::{NewTemplate, ResumeTemplate};
use crate::models::user::{NewUser, User, UserCredentials};
use crate::store::{Store, StoreError, StoreResult};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Row records
// ────────────────────────────────────────────────────────────────────────────

const RESUME_COLUMNS: &str = "id, name, owner_id, template_id, content, created_at, updated_at";
const TEMPLATE_COLUMNS: &str = "id, name, description, thumbnail, html_template, created_at";
const USER_COLUMNS: &str = "id, username, email, name, is_admin, created_at";
const API_KEY_COLUMNS: &str = "id, name, key, provider, is_active, created_at, updated_at";

#[derive(FromRow)]
struct ResumeRecord {
    id: Uuid,
    name: String,
    owner_id: Uuid,
    template_id: i32,
    content: Json<ResumeContent>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ResumeRecord {
    fn into_domain(self) -> Resume {
        Resume {
            id: self.id,
            name: self.name,
            owner_id: self.owner_id,
            template_id: self.template_id,
            content: self.content.0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: Uuid,
    username: String,
    email: String,
    name: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
    password_hash: String,
}

impl CredentialsRecord {
    fn into_domain(self) -> UserCredentials {
        UserCredentials {
            user: User {
                id: self.id,
                username: self.username,
                email: self.email,
                name: self.name,
                is_admin: self.is_admin,
                created_at: self.created_at,
            },
            password_hash: self.password_hash,
        }
    }
}

/// Maps unique violations to `Conflict` with a caller-supplied message.
fn conflict_on_unique(e: sqlx::Error, message: impl FnOnce() -> String) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict(message()),
        _ => StoreError::Database(e),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Store implementation
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl Store for PgStore {
    async fn create_resume(&self, new: NewResume) -> StoreResult<Resume> {
        let record: ResumeRecord = sqlx::query_as(&format!(
            "INSERT INTO resumes (id, name, owner_id, template_id, content)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {RESUME_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(new.owner_id)
        .bind(new.template_id)
        .bind(Json(&new.content))
        .fetch_one(&self.pool)
        .await?;

        info!(resume_id = %record.id, owner_id = %record.owner_id, "resume created");
        Ok(record.into_domain())
    }

    async fn get_resume(&self, id: Uuid) -> StoreResult<Option<Resume>> {
        let record: Option<ResumeRecord> =
            sqlx::query_as(&format!("SELECT {RESUME_COLUMNS} FROM resumes WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(record.map(ResumeRecord::into_domain))
    }

    async fn list_resumes_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Resume>> {
        let records: Vec<ResumeRecord> = sqlx::query_as(&format!(
            "SELECT {RESUME_COLUMNS} FROM resumes WHERE owner_id = $1 ORDER BY updated_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records.into_iter().map(ResumeRecord::into_domain).collect())
    }

    async fn list_all_resumes(&self) -> StoreResult<Vec<Resume>> {
        let records: Vec<ResumeRecord> = sqlx::query_as(&format!(
            "SELECT {RESUME_COLUMNS} FROM resumes ORDER BY updated_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(records.into_iter().map(ResumeRecord::into_domain).collect())
    }

    async fn update_resume(&self, id: Uuid, patch: ResumePatch) -> StoreResult<Option<Resume>> {
        // Same-microsecond updates still advance the timestamp.
        let record: Option<ResumeRecord> = sqlx::query_as(&format!(
            "UPDATE resumes SET
                 name = COALESCE($2, name),
                 template_id = COALESCE($3, template_id),
                 content = COALESCE($4, content),
                 updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
             WHERE id = $1
             RETURNING {RESUME_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.template_id)
        .bind(patch.content.map(Json))
        .fetch_optional(&self.pool)
        .await?;

        if let Some(r) = &record {
            info!(resume_id = %r.id, "resume updated");
        }
        Ok(record.map(ResumeRecord::into_domain))
    }

    async fn delete_resume(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_templates(&self) -> StoreResult<Vec<ResumeTemplate>> {
        let templates =
            sqlx::query_as(&format!("SELECT {TEMPLATE_COLUMNS} FROM resume_templates ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;
        Ok(templates)
    }

    async fn get_template(&self, id: i32) -> StoreResult<Option<ResumeTemplate>> {
        let template = sqlx::query_as(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM resume_templates WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(template)
    }

    async fn seed_templates(&self, templates: Vec<NewTemplate>) -> StoreResult<usize> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for t in &templates {
            let result = sqlx::query(
                "INSERT INTO resume_templates (id, name, description, thumbnail, html_template)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (id) DO NOTHING",
            )
            .bind(t.id)
            .bind(&t.name)
            .bind(&t.description)
            .bind(&t.thumbnail)
            .bind(&t.html_template)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected() as usize;
        }
        // Explicit ids bypass the serial; move it past them.
        sqlx::query(
            "SELECT setval(pg_get_serial_sequence('resume_templates', 'id'),
                           GREATEST((SELECT MAX(id) FROM resume_templates), 1))",
        )
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(inserted)
    }

    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let user: User = sqlx::query_as(&format!(
            "INSERT INTO users (id, username, email, name, password_hash, is_admin)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.name)
        .bind(&new.password_hash)
        .bind(new.is_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, || "Username or email already exists".to_string()))?;

        info!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }

    async fn get_user_credentials_by_username(
        &self,
        username: &str,
    ) -> StoreResult<Option<UserCredentials>> {
        let record: Option<CredentialsRecord> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record.map(CredentialsRecord::into_domain))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at"))
                .fetch_all(&self.pool)
                .await?;
        Ok(users)
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_session(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let pruned = sqlx::query("DELETE FROM auth_sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?
            .rows_affected();
        if pruned > 0 {
            debug!(pruned, "expired auth sessions removed");
        }

        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(token)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn resolve_session(&self, token: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as(
            "SELECT u.id, u.username, u.email, u.name, u.is_admin, u.created_at
             FROM auth_sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.id = $1 AND s.expires_at > NOW()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete_session(&self, token: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_api_key(&self, new: NewApiKey) -> StoreResult<ApiKey> {
        let key: ApiKey = sqlx::query_as(&format!(
            "INSERT INTO api_keys (id, name, key, provider, is_active)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {API_KEY_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.key)
        .bind(&new.provider)
        .bind(new.is_active)
        .fetch_one(&self.pool)
        .await?;

        info!(api_key_id = %key.id, provider = %key.provider, "api key created");
        Ok(key)
    }

    async fn get_active_api_key(&self, provider: &str) -> StoreResult<Option<ApiKey>> {
        let key = sqlx::query_as(&format!(
            "SELECT {API_KEY_COLUMNS} FROM api_keys
             WHERE provider = $1 AND is_active
             ORDER BY updated_at DESC
             LIMIT 1"
        ))
        .bind(provider)
        .fetch_optional(&self.pool)
        .await?;
        Ok(key)
    }

    async fn list_api_keys(&self) -> StoreResult<Vec<ApiKey>> {
        let keys =
            sqlx::query_as(&format!("SELECT {API_KEY_COLUMNS} FROM api_keys ORDER BY created_at"))
                .fetch_all(&self.pool)
                .await?;
        Ok(keys)
    }

    async fn update_api_key(&self, id: Uuid, patch: ApiKeyPatch) -> StoreResult<Option<ApiKey>> {
        let key: Option<ApiKey> = sqlx::query_as(&format!(
            "UPDATE api_keys SET
                 name = COALESCE($2, name),
                 key = COALESCE($3, key),
                 provider = COALESCE($4, provider),
                 is_active = COALESCE($5, is_active),
                 updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
             WHERE id = $1
             RETURNING {API_KEY_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.key)
        .bind(patch.provider)
        .bind(patch.is_active)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(k) = &key {
            info!(api_key_id = %k.id, "api key updated");
        }
        Ok(key)
    }

    async fn delete_api_key(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
