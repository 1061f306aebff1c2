//! Cookie sessions and access checks.
//!
//! `require_auth` resolves the `session` cookie to a `User` and stores it in
//! request extensions. `require_admin` must run inside it.

pub mod handlers;
pub mod password;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AdminBootstrap;
use crate::errors::AppError;
use crate::models::user::{NewUser, User};
use crate::state::AppState;
use crate::store::Store;

pub const SESSION_COOKIE: &str = "session";
pub const SESSION_TTL_DAYS: i64 = 30;

pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .find_map(|c| c.trim().strip_prefix("session="))
        .filter(|token| !token.is_empty())
}

pub fn session_cookie(token: &str, secure: bool) -> String {
    format!(
        "{SESSION_COOKIE}={token}; HttpOnly;{} SameSite=Lax; Path=/; Max-Age={}",
        if secure { " Secure;" } else { "" },
        Duration::days(SESSION_TTL_DAYS).num_seconds()
    )
}

pub fn expired_cookie(secure: bool) -> String {
    format!(
        "{SESSION_COOKIE}=; HttpOnly;{} SameSite=Lax; Path=/; Max-Age=0",
        if secure { " Secure;" } else { "" }
    )
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(req.headers()).ok_or(AppError::Unauthorized)?;
    let user = state
        .store
        .resolve_session(token)
        .await?
        .ok_or(AppError::Unauthorized)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    match req.extensions().get::<User>() {
        Some(user) if user.is_admin => Ok(next.run(req).await),
        Some(_) => Err(AppError::Forbidden),
        None => Err(AppError::Unauthorized),
    }
}

/// Owners and admins pass.
pub fn authorize_owner(user: &User, owner_id: Uuid) -> Result<(), AppError> {
    if user.id == owner_id || user.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Creates the configured admin account unless the username is taken.
pub async fn bootstrap_admin(store: &dyn Store, admin: &AdminBootstrap) -> anyhow::Result<()> {
    if let Some(existing) = store
        .get_user_credentials_by_username(&admin.username)
        .await?
    {
        if !existing.user.is_admin {
            warn!(
                "Bootstrap admin '{}' exists but is not an admin",
                admin.username
            );
        }
        return Ok(());
    }

    let user = store
        .create_user(NewUser {
            username: admin.username.clone(),
            email: admin.email.clone(),
            name: admin.username.clone(),
            password_hash: password::hash_password_blocking(admin.password.clone()).await?,
            is_admin: true,
        })
        .await?;
    info!("Created bootstrap admin '{}' ({})", user.username, user.id);
    Ok(())
}
