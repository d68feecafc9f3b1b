use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::chat::client::{ChatClient, ChatMessage};
use crate::chat::prompts;
use crate::errors::ApiError;

/// Only this many trailing history turns are forwarded upstream.
const HISTORY_WINDOW: usize = 10;

const FALLBACK_REPLY: &str = "I apologize, but I'm having trouble connecting right now. \
     Please try again later or contact support for assistance.";

#[derive(Deserialize, ToSchema)]
pub struct ChatRequest {
    #[schema(example = "How do I request leave?")]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// Everything the model must not see as a user turn becomes "assistant".
fn sanitize_history(history: &[ChatMessage]) -> Vec<ChatMessage> {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    history[start..]
        .iter()
        .map(|m| ChatMessage {
            role: if m.role == "user" {
                "user".to_string()
            } else {
                "assistant".to_string()
            },
            content: m.content.clone(),
        })
        .collect()
}

/// Ask the assistant a question in the caller's role context.
#[utoipa::path(
    post,
    path = "/api/chatbot",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply (canned fallback if the upstream call fails)"),
        (status = 400, description = "Empty message"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Chatbot"
)]
pub async fn chat(
    auth: AuthUser,
    client: web::Data<ChatClient>,
    payload: web::Json<ChatRequest>,
) -> Result<HttpResponse, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(ApiError::Validation("Message is required".into()));
    }

    let system_prompt = prompts::system_prompt(auth.role);
    let history = sanitize_history(&payload.history);

    let response = match client
        .complete(system_prompt, &history, &payload.message)
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(error = %e, user_id = auth.user_id, "Chat completion failed, serving fallback");
            FALLBACK_REPLY.to_string()
        }
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({ "response": response })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(role: &str, content: &str) -> ChatMessage {
        ChatMessage {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn history_is_windowed_to_the_last_ten() {
        let history: Vec<ChatMessage> =
            (0..25).map(|i| msg("user", &format!("m{}", i))).collect();

        let sanitized = sanitize_history(&history);
        assert_eq!(sanitized.len(), HISTORY_WINDOW);
        assert_eq!(sanitized[0].content, "m15");
        assert_eq!(sanitized[9].content, "m24");
    }

    #[test]
    fn unknown_roles_become_assistant() {
        let sanitized = sanitize_history(&[msg("user", "hi"), msg("system", "sneaky")]);
        assert_eq!(sanitized[0].role, "user");
        assert_eq!(sanitized[1].role, "assistant");
    }
}
