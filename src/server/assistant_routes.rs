use super::api_error::ApiError;
use super::metrics::record_assistant_request;
use super::session::Session;
use super::state::GuardedAssistant;
use super::validation::ValidationErrors;
use crate::agent::AssistantError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct PromptBody {
    pub prompt: Option<String>,
}

/// The final answer must be JSON, anything else is reported with the raw text.
fn answer_response(answer: String) -> Response {
    match serde_json::from_str::<Value>(&answer) {
        Ok(value) => {
            record_assistant_request("success");
            Json(value).into_response()
        }
        Err(e) => {
            warn!("Assistant answer is not JSON: {}", e);
            record_assistant_request("malformed_answer");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Malformed response from AI", "raw": answer })),
            )
                .into_response()
        }
    }
}

fn assistant_error_response(err: AssistantError) -> Response {
    match err {
        AssistantError::EmptyAnswer => {
            record_assistant_request("empty_answer");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "error occured in the agent-handler" })),
            )
                .into_response()
        }
        AssistantError::Llm(e) => {
            error!("Assistant model call failed: {}", e);
            record_assistant_request("llm_error");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "message": "the assistant model is unavailable" })),
            )
                .into_response()
        }
    }
}

pub async fn post_prompt(
    session: Session,
    State(assistant): State<GuardedAssistant>,
    Json(body): Json<PromptBody>,
) -> Result<Response, ApiError> {
    let mut errors = ValidationErrors::new();
    let prompt = errors.require(
        body.prompt
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()),
        "prompt",
    );
    let Some(prompt) = prompt else {
        return Err(errors.into());
    };

    info!("User {} asked the assistant", session.user_id);
    Ok(match assistant.run(&prompt, session.warehouse_id).await {
        Ok(reply) => {
            info!(
                "Assistant answered using {} tool call(s)",
                reply.tool_invocations.len()
            );
            answer_response(reply.answer)
        }
        Err(err) => assistant_error_response(err),
    })
}
