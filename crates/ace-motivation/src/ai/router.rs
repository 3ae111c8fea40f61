use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::advisor::AiAdvisor;
use super::client::ChatCompletion;
use super::types::{AiInputError, ChatMessage, ExpertEvaluationInput, StudentContext};

/// Body of a counsellor chat turn.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default, alias = "studentContext")]
    pub student_context: Option<StudentContext>,
}

/// Router builder exposing the counsellor chat and expert evaluation.
pub fn ai_router<C>(advisor: Arc<AiAdvisor<C>>) -> Router
where
    C: ChatCompletion + 'static,
{
    Router::new()
        .route("/api/v1/ai/chat", post(chat_handler::<C>))
        .route(
            "/api/v1/ai/expert-evaluation",
            post(expert_evaluation_handler::<C>),
        )
        .with_state(advisor)
}

pub(crate) async fn chat_handler<C>(
    State(advisor): State<Arc<AiAdvisor<C>>>,
    axum::Json(request): axum::Json<ChatRequest>,
) -> Response
where
    C: ChatCompletion + 'static,
{
    if request.messages.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "messages must not be empty");
    }
    if let Some(Err(error)) = request.student_context.as_ref().map(StudentContext::validate) {
        return input_error_response(error);
    }

    let reply = advisor
        .chat(&request.messages, request.student_context.as_ref())
        .await;
    let payload = json!({
        "message": reply.text,
        "degraded": reply.degraded,
        "fallback_reason": reply.fallback_reason,
        "timestamp": Utc::now(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn expert_evaluation_handler<C>(
    State(advisor): State<Arc<AiAdvisor<C>>>,
    axum::Json(input): axum::Json<ExpertEvaluationInput>,
) -> Response
where
    C: ChatCompletion + 'static,
{
    if let Err(error) = input.validate() {
        return input_error_response(error);
    }

    let reply = advisor.expert_evaluation(&input).await;
    let payload = json!({
        "evaluation": reply.text,
        "degraded": reply.degraded,
        "fallback_reason": reply.fallback_reason,
        "timestamp": Utc::now(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

fn input_error_response(error: AiInputError) -> Response {
    let status = match error {
        AiInputError::BlankStudentName => StatusCode::BAD_REQUEST,
        AiInputError::ScoreOutOfRange { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    };
    error_response(status, &error.to_string())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let payload = json!({
        "error": message,
    });
    (status, axum::Json(payload)).into_response()
}
