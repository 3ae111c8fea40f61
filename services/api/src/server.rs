use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryResultStore};
use crate::routes::with_service_routes;
use ace_motivation::ai::{AiAdvisor, HttpCompletionClient};
use ace_motivation::assessment::AssessmentService;
use ace_motivation::config::AppConfig;
use ace_motivation::error::AppError;
use ace_motivation::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryResultStore::default());
    let assessment_service = Arc::new(AssessmentService::new(store));

    let completion_client = HttpCompletionClient::new(&config.ai)?;
    if !completion_client.is_configured() {
        warn!("APP_AI_API_KEY not set; AI chat and evaluation will serve fallback text");
    }
    let advisor = Arc::new(AiAdvisor::new(Arc::new(completion_client), &config.ai));

    let app = with_service_routes(assessment_service, advisor)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, ai_model = %config.ai.model, "ace motivation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
