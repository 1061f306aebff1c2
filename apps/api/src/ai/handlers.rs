use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::extract::extract_resume;
use super::prompts::GenerationKind;
use super::{AiError, PROVIDER};
use crate::errors::AppError;
use crate::models::content::ResumeContent;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Either a parsed resume (for `complete`) or the reply text.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GeneratedContent {
    Structured(ResumeContent),
    Text(String),
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub content: GeneratedContent,
}

/// POST /api/ai/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let prompt = req
        .prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Prompt is required".to_string()))?;

    let api_key = state
        .store
        .get_active_api_key(PROVIDER)
        .await?
        .ok_or(AiError::MissingKey)?;

    let kind = GenerationKind::from_tag(req.kind.as_deref());
    info!("AI generation requested: {:?}", kind);
    let reply = state.ai.complete(&api_key.key, &kind.frame(&prompt)).await?;

    let content = match kind {
        GenerationKind::Complete => match extract_resume(&reply) {
            Some(resume) => GeneratedContent::Structured(resume),
            None => {
                warn!("AI reply for a complete resume was not valid resume JSON; returning text");
                GeneratedContent::Text(reply)
            }
        },
        _ => GeneratedContent::Text(reply),
    };

    Ok(Json(GenerateResponse { content }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::ai::client::tests::spawn_provider;
    use crate::config::Config;
    use crate::models::api_key::NewApiKey;
    use crate::routes::test_support::TestApp;
    use crate::store::Store;

    async fn app_with_provider(reply: Option<&'static str>, with_key: bool) -> TestApp {
        let mut config = Config::for_tests();
        config.openrouter_base_url = spawn_provider(reply).await;
        let app = TestApp::with_config(config).await;
        if with_key {
            app.store
                .create_api_key(NewApiKey {
                    name: "Primary".to_string(),
                    key: "sk-test-key".to_string(),
                    provider: "openrouter".to_string(),
                    is_active: true,
                })
                .await
                .unwrap();
        }
        app
    }

    #[tokio::test]
    async fn test_requires_session() {
        let app = app_with_provider(Some("x"), true).await;
        let res = app
            .send(Method::POST, "/api/ai/generate", None, Some(json!({ "prompt": "x" })))
            .await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_missing_prompt_is_rejected() {
        let app = app_with_provider(Some("x"), true).await;
        let (_, cookie) = app.user("jdoe", false).await;
        let res = app
            .send(
                Method::POST,
                "/api/ai/generate",
                Some(&cookie),
                Some(json!({ "type": "summary" })),
            )
            .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.json()["error"]["message"], "Prompt is required");
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let app = app_with_provider(Some("x"), false).await;
        let (_, cookie) = app.user("jdoe", false).await;
        let res = app
            .send(Method::POST, "/api/ai/generate", Some(&cookie), Some(json!({ "prompt": "x" })))
            .await;
        assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.json()["error"]["message"], "OpenRouter API key not configured");
    }

    #[tokio::test]
    async fn test_summary_returns_text() {
        let app = app_with_provider(Some("Seasoned backend engineer."), true).await;
        let (_, cookie) = app.user("jdoe", false).await;
        let res = app
            .send(
                Method::POST,
                "/api/ai/generate",
                Some(&cookie),
                Some(json!({ "prompt": "10 years Go", "type": "summary" })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.json()["content"], "Seasoned backend engineer.");
    }

    #[tokio::test]
    async fn test_complete_returns_structured_content() {
        let reply = "```json\n{\"personalInfo\":{\"firstName\":\"Ada\",\"lastName\":\"L\",\
                     \"email\":\"a@x.io\"},\"skills\":[{\"name\":\"Rust\"}]}\n```";
        let app = app_with_provider(Some(reply), true).await;
        let (_, cookie) = app.user("jdoe", false).await;
        let res = app
            .send(
                Method::POST,
                "/api/ai/generate",
                Some(&cookie),
                Some(json!({ "prompt": "engineer", "type": "complete" })),
            )
            .await;
        let body = res.json();
        assert_eq!(body["content"]["personalInfo"]["firstName"], "Ada");
        assert!(body["content"]["skills"][0]["id"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_complete_falls_back_to_text() {
        let app = app_with_provider(Some("Sorry, no JSON today."), true).await;
        let (_, cookie) = app.user("jdoe", false).await;
        let res = app
            .send(
                Method::POST,
                "/api/ai/generate",
                Some(&cookie),
                Some(json!({ "prompt": "engineer", "type": "complete" })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.json()["content"], "Sorry, no JSON today.");
    }

    #[tokio::test]
    async fn test_provider_failure_is_bad_gateway() {
        let app = app_with_provider(None, true).await;
        let (_, cookie) = app.user("jdoe", false).await;
        let res = app
            .send(Method::POST, "/api/ai/generate", Some(&cookie), Some(json!({ "prompt": "x" })))
            .await;
        assert_eq!(res.status, StatusCode::BAD_GATEWAY);
        assert_eq!(res.json()["error"]["message"], "AI generation failed");
    }
}
