use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use stress_check::workflows::analytics::{admin_router, AdminGate};
use stress_check::workflows::assessment::{
    assessment_router, AlertPublisher, AssessmentService, ResponseStore, SessionRepository,
};

/// Assemble the assessment flow, admin dashboard and operational probes.
pub(crate) fn app_routes<S, R, A>(
    service: Arc<AssessmentService<S, R, A>>,
    gate: Arc<AdminGate>,
) -> axum::Router
where
    S: ResponseStore + 'static,
    R: SessionRepository + 'static,
    A: AlertPublisher + 'static,
{
    let store = service.store().clone();
    assessment_router(service)
        .merge(admin_router(store, gate))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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
