//! AI content assist.
//!
//! One request, one reply: the prompt is framed by `prompts`, sent through
//! `client::AiClient` with the active `openrouter` key, and for full-resume
//! requests the reply goes through `extract` before it is returned.

pub mod client;
pub mod extract;
pub mod handlers;
pub mod prompts;

use thiserror::Error;
use tracing::info;

use crate::models::api_key::NewApiKey;
use crate::store::Store;

/// Provider name API keys are stored under.
pub const PROVIDER: &str = "openrouter";

#[derive(Debug, Error)]
pub enum AiError {
    #[error("no active {PROVIDER} API key")]
    MissingKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider returned no completion")]
    EmptyContent,
}

/// Stores `key` as the active provider key unless one is already active.
pub async fn seed_api_key(store: &dyn Store, key: &str) -> anyhow::Result<()> {
    if store.get_active_api_key(PROVIDER).await?.is_some() {
        return Ok(());
    }
    store
        .create_api_key(NewApiKey {
            name: "Environment".to_string(),
            key: key.to_string(),
            provider: PROVIDER.to_string(),
            is_active: true,
        })
        .await?;
    info!("Stored {PROVIDER} API key from environment");
    Ok(())
}
