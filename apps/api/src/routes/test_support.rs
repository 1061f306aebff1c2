//! Drives the real router against `MemoryStore` with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::ai::client::AiClient;
use crate::config::Config;
use crate::models::content::ResumeContent;
use crate::models::resume::{NewResume, Resume};
use crate::models::user::{NewUser, User};
use crate::render::catalog::{builtin_templates, DEFAULT_TEMPLATE_ID};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::memory::MemoryStore;
use crate::store::Store;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).unwrap()
    }

    /// The `name=value` part of `Set-Cookie`.
    pub fn cookie(&self) -> Option<String> {
        let raw = self.headers.get(header::SET_COOKIE)?.to_str().ok()?;
        raw.split(';').next().map(str::to_string)
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(Config::for_tests()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        store.seed_templates(builtin_templates()).await.unwrap();
        let state = AppState {
            store: store.clone(),
            ai: AiClient::new(&config).unwrap(),
            config,
        };
        TestApp {
            router: build_router(state),
            store,
        }
    }

    /// Creates a user with a live session and returns it with its cookie.
    pub async fn user(&self, username: &str, is_admin: bool) -> (User, String) {
        let user = self
            .store
            .create_user(NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                name: username.to_string(),
                password_hash: "unused".to_string(),
                is_admin,
            })
            .await
            .unwrap();
        let token = Uuid::new_v4().to_string();
        self.store
            .create_session(&token, user.id, Utc::now() + Duration::days(1))
            .await
            .unwrap();
        (user, format!("session={token}"))
    }

    pub async fn resume_for(&self, owner: &User, content: ResumeContent) -> Resume {
        self.store
            .create_resume(NewResume {
                name: "My Resume".to_string(),
                owner_id: owner.id,
                template_id: DEFAULT_TEMPLATE_ID,
                content,
            })
            .await
            .unwrap()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// A document that passes content validation.
pub fn jane_doe() -> ResumeContent {
    serde_json::from_value(serde_json::json!({
        "personalInfo": { "firstName": "Jane", "lastName": "Doe", "email": "jane@example.com" },
        "skills": [{ "id": "s1", "name": "Go" }]
    }))
    .unwrap()
}
