use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_OPENROUTER_MODEL: &str = "openai/gpt-3.5-turbo";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub openrouter_base_url: String,
    pub openrouter_model: String,
    /// Public URL of the app, sent to OpenRouter as the referer.
    pub app_url: String,
    /// Adds `Secure` to the session cookie.
    pub cookie_secure: bool,
    /// Parent directory for export render surfaces. System temp dir when unset.
    pub export_scratch_dir: Option<PathBuf>,
    /// Admin account created at startup if no user has this username.
    pub bootstrap_admin: Option<AdminBootstrap>,
    /// Stored as the active `openrouter` key at startup if none is active.
    pub openrouter_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let bootstrap_admin = match optional_env("ADMIN_USERNAME") {
            Some(username) => Some(AdminBootstrap {
                username,
                email: require_env("ADMIN_EMAIL")?,
                password: require_env("ADMIN_PASSWORD")?,
            }),
            None => None,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            openrouter_base_url: optional_env("OPENROUTER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENROUTER_BASE_URL.to_string()),
            openrouter_model: optional_env("OPENROUTER_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL.to_string()),
            app_url: optional_env("APP_URL").unwrap_or_else(|| "http://localhost:5000".to_string()),
            cookie_secure: optional_env("COOKIE_SECURE")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            export_scratch_dir: optional_env("EXPORT_SCRATCH_DIR").map(PathBuf::from),
            bootstrap_admin,
            openrouter_api_key: optional_env("OPENROUTER_API_KEY"),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://unused".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            openrouter_base_url: "http://127.0.0.1:9".to_string(),
            openrouter_model: DEFAULT_OPENROUTER_MODEL.to_string(),
            app_url: "http://localhost:5000".to_string(),
            cookie_secure: false,
            export_scratch_dir: None,
            bootstrap_admin: None,
            openrouter_api_key: None,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and empty are the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
