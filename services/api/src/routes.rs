use crate::infra::AppState;
use crate::report::score_responses;
use ace_motivation::ai::{ai_router, AiAdvisor, ChatCompletion};
use ace_motivation::assessment::{
    assessment_router, AssessmentService, QuestionnaireResult, RawResponses, ResultStore, Role,
};
use ace_motivation::error::AppError;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

const ANONYMOUS_USER_ID: &str = "anonymous";

/// Body of a stateless scoring request.
#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) role: Role,
    pub(crate) responses: RawResponses,
    #[serde(default)]
    pub(crate) user_id: Option<String>,
}

pub(crate) fn with_service_routes<S, C>(
    assessments: Arc<AssessmentService<S>>,
    advisor: Arc<AiAdvisor<C>>,
) -> axum::Router
where
    S: ResultStore + 'static,
    C: ChatCompletion + 'static,
{
    assessment_router(assessments)
        .merge(ai_router(advisor))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/score", axum::routing::post(score_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Score an answer set without storing it.
pub(crate) async fn score_endpoint(
    Json(payload): Json<ScoreRequest>,
) -> Result<Json<QuestionnaireResult>, AppError> {
    let ScoreRequest {
        role,
        responses,
        user_id,
    } = payload;

    let user_id = user_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| ANONYMOUS_USER_ID.to_string());

    Ok(Json(score_responses(role, &user_id, &responses)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryResultStore;
    use ace_motivation::ai::HttpCompletionClient;
    use ace_motivation::assessment::{MotivationTypeId, QuestionId};
    use ace_motivation::config::AiConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn full_answers(role: Role, value: i64) -> RawResponses {
        QuestionId::all_for(role)
            .map(|id| (id.to_string(), value))
            .collect()
    }

    fn test_app(ready: bool) -> axum::Router {
        let store = Arc::new(InMemoryResultStore::default());
        let assessments = Arc::new(AssessmentService::new(store));
        let ai_config = AiConfig {
            api_key: None,
            ..AiConfig::default()
        };
        let client = HttpCompletionClient::new(&ai_config).expect("client builds");
        let advisor = Arc::new(AiAdvisor::new(Arc::new(client), &ai_config));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };

        with_service_routes(assessments, advisor).layer(Extension(state))
    }

    async fn send(app: axum::Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .oneshot(builder.body(body).expect("request builds"))
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body readable");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn health_and_readiness_report_status() {
        let (status, body) = send(test_app(false), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = send(test_app(false), Method::GET, "/ready", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        let (status, _) = send(test_app(true), Method::GET, "/ready", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn score_endpoint_classifies_without_storing() {
        let Json(result) = score_endpoint(Json(ScoreRequest {
            role: Role::Student,
            responses: full_answers(Role::Student, 5),
            user_id: Some("  ".to_string()),
        }))
        .await
        .expect("scores");

        assert_eq!(result.motivation_type.id, MotivationTypeId::Achiever);
        assert_eq!(result.user_id, "anonymous");
        assert_eq!(result.suggestions.len(), 3);
    }

    #[tokio::test]
    async fn score_endpoint_maps_invalid_answers_to_422() {
        let mut responses = full_answers(Role::Student, 3);
        responses.insert("A1".to_string(), 7);

        let (status, body) = send(
            test_app(true),
            Method::POST,
            "/api/v1/score",
            Some(json!({ "role": "student", "responses": responses })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["error"],
            "invalid responses: question A1 answered with 7, expected 1..=5"
        );
    }

    #[tokio::test]
    async fn merged_router_serves_assessments_and_degraded_ai() {
        let app = test_app(true);

        let (status, body) = send(
            app.clone(),
            Method::POST,
            "/api/v1/assessments/student/family-1",
            Some(json!({ "responses": full_answers(Role::Student, 4) })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["result"]["report_id"]
            .as_str()
            .expect("report id")
            .starts_with("RPT-"));

        let (status, body) = send(
            app,
            Method::POST,
            "/api/v1/ai/chat",
            Some(json!({ "messages": [{ "role": "user", "content": "what is a goal?" }] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["degraded"], true);
        assert_eq!(body["fallback_reason"], "not_configured");
    }
}
