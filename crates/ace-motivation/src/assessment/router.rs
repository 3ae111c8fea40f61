use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::classification::MOTIVATION_TYPES;
use super::domain::Role;
use super::questions::QuestionBank;
use super::responses::RawResponses;
use super::service::{AssessmentService, AssessmentServiceError};
use super::store::ResultStore;

/// Body of a progress save.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressRequest {
    #[serde(default)]
    pub current_question: usize,
    #[serde(default)]
    pub responses: RawResponses,
}

/// Body of a questionnaire submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionRequest {
    pub responses: RawResponses,
}

/// Router builder exposing the questionnaire, result and report endpoints.
pub fn assessment_router<S>(service: Arc<AssessmentService<S>>) -> Router
where
    S: ResultStore + 'static,
{
    Router::new()
        .route("/api/v1/questions/:role", get(questions_handler))
        .route("/api/v1/motivation-types", get(motivation_types_handler))
        .route(
            "/api/v1/assessments/combined/:user_id",
            get(combined_handler::<S>),
        )
        .route(
            "/api/v1/assessments/:role/:user_id",
            get(result_handler::<S>).post(complete_handler::<S>),
        )
        .route(
            "/api/v1/assessments/:role/:user_id/progress",
            get(load_progress_handler::<S>).put(save_progress_handler::<S>),
        )
        .route("/api/v1/reports", get(reports_handler::<S>))
        .route("/api/v1/reports/:report_id", get(report_handler::<S>))
        .with_state(service)
}

pub(crate) async fn questions_handler(Path(role): Path<String>) -> Response {
    match role.parse::<Role>() {
        Ok(role) => (StatusCode::OK, axum::Json(QuestionBank::for_role(role))).into_response(),
        Err(error) => error_response(StatusCode::BAD_REQUEST, error.to_string()),
    }
}

pub(crate) async fn motivation_types_handler() -> Response {
    (StatusCode::OK, axum::Json(&MOTIVATION_TYPES[..])).into_response()
}

pub(crate) async fn save_progress_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path((role, user_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<ProgressRequest>,
) -> Response
where
    S: ResultStore + 'static,
{
    let role = match role.parse::<Role>() {
        Ok(role) => role,
        Err(error) => return error_response(StatusCode::BAD_REQUEST, error.to_string()),
    };

    match service.save_progress(role, &user_id, request.current_question, &request.responses) {
        Ok(progress) => (StatusCode::OK, axum::Json(progress)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn load_progress_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path((role, user_id)): Path<(String, String)>,
) -> Response
where
    S: ResultStore + 'static,
{
    let role = match role.parse::<Role>() {
        Ok(role) => role,
        Err(error) => return error_response(StatusCode::BAD_REQUEST, error.to_string()),
    };

    match service.load_progress(role, &user_id) {
        Ok(Some(progress)) => (StatusCode::OK, axum::Json(progress)).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "no saved progress".to_string()),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn complete_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path((role, user_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<CompletionRequest>,
) -> Response
where
    S: ResultStore + 'static,
{
    let role = match role.parse::<Role>() {
        Ok(role) => role,
        Err(error) => return error_response(StatusCode::BAD_REQUEST, error.to_string()),
    };

    match service.complete(role, &user_id, &request.responses) {
        Ok(completion) => (StatusCode::CREATED, axum::Json(completion)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn result_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path((role, user_id)): Path<(String, String)>,
) -> Response
where
    S: ResultStore + 'static,
{
    let role = match role.parse::<Role>() {
        Ok(role) => role,
        Err(error) => return error_response(StatusCode::BAD_REQUEST, error.to_string()),
    };

    match service.result(role, &user_id) {
        Ok(Some(result)) => (StatusCode::OK, axum::Json(result)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            format!("no {role} result for user '{user_id}'"),
        ),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn combined_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(user_id): Path<String>,
) -> Response
where
    S: ResultStore + 'static,
{
    match service.combined(&user_id) {
        Ok(Some(combined)) => (StatusCode::OK, axum::Json(combined)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "combined report requires both student and parent results".to_string(),
        ),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn reports_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
) -> Response
where
    S: ResultStore + 'static,
{
    match service.reports() {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn report_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(report_id): Path<String>,
) -> Response
where
    S: ResultStore + 'static,
{
    match service.report(&report_id) {
        Ok(Some(lookup)) => (StatusCode::OK, axum::Json(lookup)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            format!("report '{report_id}' not found"),
        ),
        Err(error) => service_error_response(error),
    }
}

fn service_error_response(error: AssessmentServiceError) -> Response {
    let status = match &error {
        AssessmentServiceError::Responses(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AssessmentServiceError::BlankUserId | AssessmentServiceError::InvalidReportId(_) => {
            StatusCode::BAD_REQUEST
        }
        AssessmentServiceError::Store(_) | AssessmentServiceError::ReportIdExhausted(_) => {
            tracing::error!(error = %error, "assessment request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, error.to_string())
}

fn error_response(status: StatusCode, message: String) -> Response {
    let payload = json!({
        "error": message,
    });
    (status, axum::Json(payload)).into_response()
}
