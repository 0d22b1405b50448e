use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::SessionId;
use super::repository::{AlertPublisher, SessionRepository};
use super::service::{AssessmentService, AssessmentServiceError};
use super::session::AssessmentError;
use super::store::ResponseStore;

/// Which surface a request is addressed to, chosen by the `mode` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Assessment,
    Admin,
}

#[derive(Debug, Default, Deserialize)]
pub struct SurfaceQuery {
    #[serde(default)]
    pub mode: Option<String>,
}

impl SurfaceQuery {
    pub fn surface(&self) -> Surface {
        match self.mode.as_deref().map(str::trim) {
            Some("admin") => Surface::Admin,
            _ => Surface::Assessment,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AnswerRequest {
    pub label: String,
}

/// Router exposing the respondent-facing assessment flow.
pub fn assessment_router<S, R, A>(service: Arc<AssessmentService<S, R, A>>) -> Router
where
    S: ResponseStore + 'static,
    R: SessionRepository + 'static,
    A: AlertPublisher + 'static,
{
    Router::new()
        .route("/api/v1/entry", get(entry_handler))
        .route(
            "/api/v1/assessment/sessions",
            post(start_handler::<S, R, A>),
        )
        .route(
            "/api/v1/assessment/sessions/:session_id",
            get(view_handler::<S, R, A>),
        )
        .route(
            "/api/v1/assessment/sessions/:session_id/answers",
            post(answer_handler::<S, R, A>),
        )
        .route(
            "/api/v1/assessment/sessions/:session_id/restart",
            post(restart_handler::<S, R, A>),
        )
        .with_state(service)
}

pub(crate) async fn entry_handler(Query(query): Query<SurfaceQuery>) -> Response {
    let payload = match query.surface() {
        Surface::Assessment => json!({
            "surface": Surface::Assessment,
            "next": "/api/v1/assessment/sessions",
        }),
        Surface::Admin => json!({
            "surface": Surface::Admin,
            "next": "/api/v1/admin/login",
        }),
    };
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn start_handler<S, R, A>(
    State(service): State<Arc<AssessmentService<S, R, A>>>,
    Query(query): Query<SurfaceQuery>,
) -> Response
where
    S: ResponseStore + 'static,
    R: SessionRepository + 'static,
    A: AlertPublisher + 'static,
{
    if query.surface() == Surface::Admin {
        let payload = json!({
            "error": "admin mode does not run the assessment",
            "surface": Surface::Admin,
        });
        return (StatusCode::CONFLICT, Json(payload)).into_response();
    }

    match service.start(Local::now().naive_local()) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn view_handler<S, R, A>(
    State(service): State<Arc<AssessmentService<S, R, A>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: ResponseStore + 'static,
    R: SessionRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.view(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn answer_handler<S, R, A>(
    State(service): State<Arc<AssessmentService<S, R, A>>>,
    Path(session_id): Path<String>,
    Json(request): Json<AnswerRequest>,
) -> Response
where
    S: ResponseStore + 'static,
    R: SessionRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.answer(&SessionId(session_id), &request.label) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn restart_handler<S, R, A>(
    State(service): State<Arc<AssessmentService<S, R, A>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: ResponseStore + 'static,
    R: SessionRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.restart(&SessionId(session_id), Local::now().naive_local()) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: AssessmentServiceError) -> Response {
    let status = match &err {
        AssessmentServiceError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Assessment(AssessmentError::OutOfRangeIndex { .. }) => {
            tracing::error!(error = %err, "session index invariant violated");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        AssessmentServiceError::Assessment(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AssessmentServiceError::Sessions(_) | AssessmentServiceError::Store(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
