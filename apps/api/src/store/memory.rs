//! In-memory `Store` for handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::api_key::{ApiKey, ApiKeyPatch, NewApiKey};
use crate::models::resume::{NewResume, Resume, ResumePatch};
use crate::models::template::{NewTemplate, ResumeTemplate};
use crate::models::user::{NewUser, User, UserCredentials};
use crate::store::{Store, StoreError, StoreResult};

#[derive(Default)]
struct Inner {
    users: Vec<UserCredentials>,
    sessions: Vec<(String, Uuid, DateTime<Utc>)>,
    resumes: Vec<Resume>,
    templates: Vec<ResumeTemplate>,
    api_keys: Vec<ApiKey>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

/// Now, or one microsecond past `previous` when the clock has not moved.
fn advance(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous + Duration::microseconds(1))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_resume(&self, new: NewResume) -> StoreResult<Resume> {
        let now = Utc::now();
        let resume = Resume {
            id: Uuid::new_v4(),
            name: new.name,
            owner_id: new.owner_id,
            template_id: new.template_id,
            content: new.content,
            created_at: now,
            updated_at: now,
        };
        self.lock().resumes.push(resume.clone());
        Ok(resume)
    }

    async fn get_resume(&self, id: Uuid) -> StoreResult<Option<Resume>> {
        Ok(self.lock().resumes.iter().find(|r| r.id == id).cloned())
    }

    async fn list_resumes_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Resume>> {
        let mut resumes: Vec<Resume> = self
            .lock()
            .resumes
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        resumes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(resumes)
    }

    async fn list_all_resumes(&self) -> StoreResult<Vec<Resume>> {
        let mut resumes = self.lock().resumes.clone();
        resumes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(resumes)
    }

    async fn update_resume(&self, id: Uuid, patch: ResumePatch) -> StoreResult<Option<Resume>> {
        let mut inner = self.lock();
        let Some(resume) = inner.resumes.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            resume.name = name;
        }
        if let Some(template_id) = patch.template_id {
            resume.template_id = template_id;
        }
        if let Some(content) = patch.content {
            resume.content = content;
        }
        resume.updated_at = advance(resume.updated_at);
        Ok(Some(resume.clone()))
    }

    async fn delete_resume(&self, id: Uuid) -> StoreResult<bool> {
        let mut inner = self.lock();
        let before = inner.resumes.len();
        inner.resumes.retain(|r| r.id != id);
        Ok(inner.resumes.len() < before)
    }

    async fn list_templates(&self) -> StoreResult<Vec<ResumeTemplate>> {
        let mut templates = self.lock().templates.clone();
        templates.sort_by_key(|t| t.id);
        Ok(templates)
    }

    async fn get_template(&self, id: i32) -> StoreResult<Option<ResumeTemplate>> {
        Ok(self.lock().templates.iter().find(|t| t.id == id).cloned())
    }

    async fn seed_templates(&self, templates: Vec<NewTemplate>) -> StoreResult<usize> {
        let mut inner = self.lock();
        let mut inserted = 0;
        for t in templates {
            if inner.templates.iter().any(|existing| existing.id == t.id) {
                continue;
            }
            inner.templates.push(ResumeTemplate {
                id: t.id,
                name: t.name,
                description: t.description,
                thumbnail: t.thumbnail,
                html_template: t.html_template,
                created_at: Utc::now(),
            });
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let mut inner = self.lock();
        if inner
            .users
            .iter()
            .any(|c| c.user.username == new.username || c.user.email == new.email)
        {
            return Err(StoreError::Conflict(
                "Username or email already exists".to_string(),
            ));
        }
        let user = User {
            id: Uuid::new_v4(),
            username: new.username,
            email: new.email,
            name: new.name,
            is_admin: new.is_admin,
            created_at: Utc::now(),
        };
        inner.users.push(UserCredentials {
            user: user.clone(),
            password_hash: new.password_hash,
        });
        Ok(user)
    }

    async fn get_user_credentials_by_username(
        &self,
        username: &str,
    ) -> StoreResult<Option<UserCredentials>> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|c| c.user.username == username)
            .cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.lock().users.iter().map(|c| c.user.clone()).collect())
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let mut inner = self.lock();
        let before = inner.users.len();
        inner.users.retain(|c| c.user.id != id);
        if inner.users.len() == before {
            return Ok(false);
        }
        inner.resumes.retain(|r| r.owner_id != id);
        inner.sessions.retain(|(_, user_id, _)| *user_id != id);
        Ok(true)
    }

    async fn create_session(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut inner = self.lock();
        let now = Utc::now();
        inner.sessions.retain(|(_, _, expires)| *expires > now);
        inner.sessions.push((token.to_string(), user_id, expires_at));
        Ok(())
    }

    async fn resolve_session(&self, token: &str) -> StoreResult<Option<User>> {
        let inner = self.lock();
        let now = Utc::now();
        let user_id = inner
            .sessions
            .iter()
            .find(|(t, _, expires_at)| t == token && *expires_at > now)
            .map(|(_, user_id, _)| *user_id);
        Ok(user_id.and_then(|id| {
            inner
                .users
                .iter()
                .find(|c| c.user.id == id)
                .map(|c| c.user.clone())
        }))
    }

    async fn delete_session(&self, token: &str) -> StoreResult<()> {
        self.lock().sessions.retain(|(t, _, _)| t != token);
        Ok(())
    }

    async fn create_api_key(&self, new: NewApiKey) -> StoreResult<ApiKey> {
        let now = Utc::now();
        let key = ApiKey {
            id: Uuid::new_v4(),
            name: new.name,
            key: new.key,
            provider: new.provider,
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        };
        self.lock().api_keys.push(key.clone());
        Ok(key)
    }

    async fn get_active_api_key(&self, provider: &str) -> StoreResult<Option<ApiKey>> {
        Ok(self
            .lock()
            .api_keys
            .iter()
            .filter(|k| k.provider == provider && k.is_active)
            .max_by_key(|k| k.updated_at)
            .cloned())
    }

    async fn list_api_keys(&self) -> StoreResult<Vec<ApiKey>> {
        Ok(self.lock().api_keys.clone())
    }

    async fn update_api_key(&self, id: Uuid, patch: ApiKeyPatch) -> StoreResult<Option<ApiKey>> {
        let mut inner = self.lock();
        let Some(key) = inner.api_keys.iter_mut().find(|k| k.id == id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            key.name = name;
        }
        if let Some(secret) = patch.key {
            key.key = secret;
        }
        if let Some(provider) = patch.provider {
            key.provider = provider;
        }
        if let Some(is_active) = patch.is_active {
            key.is_active = is_active;
        }
        key.updated_at = advance(key.updated_at);
        Ok(Some(key.clone()))
    }

    async fn delete_api_key(&self, id: Uuid) -> StoreResult<bool> {
        let mut inner = self.lock();
        let before = inner.api_keys.len();
        inner.api_keys.retain(|k| k.id != id);
        Ok(inner.api_keys.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::ResumeContent;

    fn new_resume(owner_id: Uuid, name: &str) -> NewResume {
        NewResume {
            name: name.to_string(),
            owner_id,
            template_id: 1,
            content: ResumeContent::default(),
        }
    }

    #[tokio::test]
    async fn test_update_always_advances_updated_at() {
        let store = MemoryStore::new();
        let resume = store.create_resume(new_resume(Uuid::new_v4(), "CV")).await.unwrap();

        let mut previous = resume.updated_at;
        for _ in 0..5 {
            let updated = store
                .update_resume(resume.id, ResumePatch::default())
                .await
                .unwrap()
                .unwrap();
            assert!(updated.updated_at > previous);
            previous = updated.updated_at;
        }
    }

    #[tokio::test]
    async fn test_update_keeps_owner_and_absent_fields() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let resume = store.create_resume(new_resume(owner, "CV")).await.unwrap();
        let updated = store
            .update_resume(
                resume.id,
                ResumePatch {
                    template_id: Some(2),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.owner_id, owner);
        assert_eq!(updated.name, "CV");
        assert_eq!(updated.template_id, 2);
    }

    #[tokio::test]
    async fn test_list_by_owner_scopes_and_orders() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let first = store.create_resume(new_resume(owner, "A")).await.unwrap();
        store.create_resume(new_resume(owner, "B")).await.unwrap();
        store.create_resume(new_resume(Uuid::new_v4(), "other")).await.unwrap();
        store.update_resume(first.id, ResumePatch::default()).await.unwrap();

        let listed = store.list_resumes_by_owner(owner).await.unwrap();
        let names: Vec<&str> = listed.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(store.list_all_resumes().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let store = MemoryStore::new();
        let user = store
            .create_user(NewUser {
                username: "jane".to_string(),
                email: "jane@x.com".to_string(),
                name: "Jane".to_string(),
                password_hash: "hash".to_string(),
                is_admin: false,
            })
            .await
            .unwrap();
        store.create_resume(new_resume(user.id, "CV")).await.unwrap();
        store
            .create_session("t", user.id, Utc::now() + Duration::days(1))
            .await
            .unwrap();

        assert!(store.delete_user(user.id).await.unwrap());
        assert!(store.list_all_resumes().await.unwrap().is_empty());
        assert!(store.resolve_session("t").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_does_not_resolve() {
        let store = MemoryStore::new();
        let user = store
            .create_user(NewUser {
                username: "jane".to_string(),
                email: "jane@x.com".to_string(),
                name: "Jane".to_string(),
                password_hash: "hash".to_string(),
                is_admin: false,
            })
            .await
            .unwrap();
        store
            .create_session("old", user.id, Utc::now() - Duration::seconds(1))
            .await
            .unwrap();
        assert!(store.resolve_session("old").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_new_session_prunes_expired_ones() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        store
            .create_session("old", user_id, Utc::now() - Duration::seconds(1))
            .await
            .unwrap();
        store
            .create_session("live", user_id, Utc::now() + Duration::days(1))
            .await
            .unwrap();
        store
            .create_session("fresh", user_id, Utc::now() + Duration::days(1))
            .await
            .unwrap();

        let tokens: Vec<String> = store
            .lock()
            .sessions
            .iter()
            .map(|(token, _, _)| token.clone())
            .collect();
        assert_eq!(tokens, vec!["live".to_string(), "fresh".to_string()]);
    }
}
