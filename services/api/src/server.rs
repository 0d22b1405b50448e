use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySessionRepository, LoggingAlertPublisher};
use crate::routes::app_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use stress_check::config::AppConfig;
use stress_check::error::AppError;
use stress_check::telemetry;
use stress_check::workflows::analytics::AdminGate;
use stress_check::workflows::assessment::{AssessmentService, CsvResponseStore};
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

    let store = Arc::new(CsvResponseStore::open(&config.storage.responses_path)?);
    let sessions = Arc::new(InMemorySessionRepository::default());
    let alerts = Arc::new(LoggingAlertPublisher::default());
    let service = Arc::new(AssessmentService::new(store, sessions, alerts));

    let gate = Arc::new(AdminGate::from_config(&config.admin));
    if !gate.is_enabled() {
        warn!("APP_ADMIN_PASSWORD_HASH is unset; the analytics dashboard refuses all logins");
    }

    let app = app_routes(service, gate)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        responses = %config.storage.responses_path.display(),
        "stress assessment service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
