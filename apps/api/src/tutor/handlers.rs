//! Axum route handler for the tutor chat.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::llm_client::prompts::render_template;
use crate::llm_client::TextGenerator;
use crate::state::AppState;
use crate::tutor::prompts::{
    DEFAULT_CONTEXT, TUTOR_PROMPT_TEMPLATE, TUTOR_SYSTEM, TUTOR_UNAVAILABLE_REPLY,
};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    pub context: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ChatResponse {
    pub reply: String,
}

pub fn build_prompt(message: &str, context: Option<&str>) -> String {
    let context = context
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CONTEXT);
    render_template(
        TUTOR_PROMPT_TEMPLATE,
        &[("context", context), ("message", message.trim())],
    )
}

/// Replies from the model, or with a fixed apology when the provider fails.
pub async fn tutor_reply(generator: &dyn TextGenerator, message: &str, context: Option<&str>) -> String {
    let prompt = build_prompt(message, context);
    match generator.generate(&prompt, TUTOR_SYSTEM).await {
        Ok(reply) => reply.trim().to_string(),
        Err(e) => {
            warn!("Tutor chat failed: {e}");
            TUTOR_UNAVAILABLE_REPLY.to_string()
        }
    }
}

/// POST /api/ai/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if req.message.trim().is_empty() {
        return Err(AppError::Validation("message is required".to_string()));
    }

    let reply = tutor_reply(state.llm.as_ref(), &req.message, req.context.as_deref()).await;
    Ok(Json(ChatResponse { reply }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::StubGenerator;

    #[test]
    fn test_prompt_defaults_context() {
        let prompt = build_prompt("What is a closure?", None);
        assert!(prompt.contains("Context: General knowledge"));
        assert!(prompt.contains("Student: What is a closure?"));
        assert!(prompt.trim_end().ends_with("Tutor:"));
    }

    #[test]
    fn test_prompt_uses_given_context() {
        let prompt = build_prompt("Explain", Some("You are an expert HR and Career Coach."));
        assert!(prompt.contains("Context: You are an expert HR and Career Coach."));
    }

    #[test]
    fn test_context_placeholder_in_message_stays_literal() {
        let prompt = build_prompt("What does {context} mean here?", Some("Rust"));
        assert!(prompt.contains("Student: What does {context} mean here?"));
        assert!(prompt.contains("Context: Rust"));
    }

    #[test]
    fn test_blank_context_falls_back_to_default() {
        assert!(build_prompt("hi", Some("   ")).contains(DEFAULT_CONTEXT));
    }

    #[tokio::test]
    async fn test_reply_is_trimmed() {
        let reply = tutor_reply(&StubGenerator::replying("  A closure captures.\n"), "q", None).await;
        assert_eq!(reply, "A closure captures.");
    }

    #[tokio::test]
    async fn test_provider_failure_gives_apology() {
        let reply = tutor_reply(&StubGenerator::failing(), "q", None).await;
        assert_eq!(reply, TUTOR_UNAVAILABLE_REPLY);
    }
}
