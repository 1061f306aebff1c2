use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::{expired_cookie, password, session_cookie, session_token, SESSION_TTL_DAYS};
use crate::editor::validation::{has_min_len, is_valid_email};
use crate::errors::AppError;
use crate::models::user::{NewUser, User};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

fn validate_registration(req: &RegisterRequest) -> Result<(), AppError> {
    if !has_min_len(&req.username, 3) {
        return Err(AppError::Validation(
            "Username must be at least 3 characters".to_string(),
        ));
    }
    if !is_valid_email(&req.email) {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }
    if !has_min_len(&req.name, 2) {
        return Err(AppError::Validation(
            "Name must be at least 2 characters".to_string(),
        ));
    }
    if req.password.chars().count() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

/// Opens a session for `user` and returns the `Set-Cookie` value.
async fn start_session(state: &AppState, user: &User) -> Result<String, AppError> {
    let token = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + Duration::days(SESSION_TTL_DAYS);
    state
        .store
        .create_session(&token, user.id, expires_at)
        .await?;
    Ok(session_cookie(&token, state.config.cookie_secure))
}

/// POST /api/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_registration(&req)?;

    let password_hash = password::hash_password_blocking(req.password.clone()).await?;
    let user = state
        .store
        .create_user(NewUser {
            username: req.username.trim().to_string(),
            email: req.email.trim().to_string(),
            name: req.name.trim().to_string(),
            password_hash,
            is_admin: false,
        })
        .await?;
    info!("Registered user {} ({})", user.username, user.id);

    let cookie = start_session(&state, &user).await?;
    Ok((StatusCode::CREATED, [(header::SET_COOKIE, cookie)], Json(user)))
}

/// POST /api/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let creds = state
        .store
        .get_user_credentials_by_username(req.username.trim())
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !password::verify_password_blocking(req.password, creds.password_hash).await? {
        return Err(AppError::InvalidCredentials);
    }

    let cookie = start_session(&state, &creds.user).await?;
    Ok(([(header::SET_COOKIE, cookie)], Json(creds.user)))
}

/// POST /api/logout
/// Works without a live session so a stale cookie can always be cleared.
pub async fn handle_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    if let Some(token) = session_token(&headers) {
        state.store.delete_session(token).await?;
    }
    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, expired_cookie(state.config.cookie_secure))],
    ))
}

/// GET /api/user
pub async fn handle_current_user(Extension(user): Extension<User>) -> Json<User> {
    Json(user)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::TestApp;

    fn registration() -> serde_json::Value {
        json!({
            "username": "jdoe",
            "email": "jane@example.com",
            "name": "Jane Doe",
            "password": "s3cret!"
        })
    }

    #[tokio::test]
    async fn test_register_sets_cookie_and_hides_hash() {
        let app = TestApp::new().await;
        let res = app
            .send(Method::POST, "/api/register", None, Some(registration()))
            .await;
        assert_eq!(res.status, StatusCode::CREATED);
        assert!(res.cookie().is_some());
        assert_eq!(res.json()["username"], "jdoe");
        assert!(res.json().get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let app = TestApp::new().await;
        let mut body = registration();
        body["password"] = json!("123");
        let res = app.send(Method::POST, "/api/register", None, Some(body)).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let app = TestApp::new().await;
        app.send(Method::POST, "/api/register", None, Some(registration()))
            .await;
        let mut body = registration();
        body["email"] = json!("other@example.com");
        let res = app.send(Method::POST, "/api/register", None, Some(body)).await;
        assert_eq!(res.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_login_then_current_user_then_logout() {
        let app = TestApp::new().await;
        app.send(Method::POST, "/api/register", None, Some(registration()))
            .await;

        let bad = app
            .send(
                Method::POST,
                "/api/login",
                None,
                Some(json!({ "username": "jdoe", "password": "wrong-pw" })),
            )
            .await;
        assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
        assert_eq!(bad.json()["error"]["message"], "Invalid username or password");

        let ok = app
            .send(
                Method::POST,
                "/api/login",
                None,
                Some(json!({ "username": "jdoe", "password": "s3cret!" })),
            )
            .await;
        assert_eq!(ok.status, StatusCode::OK);
        let cookie = ok.cookie().unwrap();

        let me = app.send(Method::GET, "/api/user", Some(&cookie), None).await;
        assert_eq!(me.status, StatusCode::OK);
        assert_eq!(me.json()["email"], "jane@example.com");

        let out = app.send(Method::POST, "/api/logout", Some(&cookie), None).await;
        assert_eq!(out.status, StatusCode::NO_CONTENT);

        let after = app.send(Method::GET, "/api/user", Some(&cookie), None).await;
        assert_eq!(after.status, StatusCode::UNAUTHORIZED);
    }
}
