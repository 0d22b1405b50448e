use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::auth::{AdminGate, AuthError};
use super::summary::AnalyticsSummary;
use crate::workflows::assessment::store::write_csv;
use crate::workflows::assessment::ResponseStore;

pub const EXPORT_FILENAME: &str = "brac_ied_data.csv";

/// Shared state for the admin surface.
pub struct AdminState<S> {
    pub store: Arc<S>,
    pub gate: Arc<AdminGate>,
}

impl<S> Clone for AdminState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            gate: self.gate.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Router exposing the analytics dashboard behind the admin gate.
pub fn admin_router<S>(store: Arc<S>, gate: Arc<AdminGate>) -> Router
where
    S: ResponseStore + 'static,
{
    Router::new()
        .route("/api/v1/admin/login", post(login_handler::<S>))
        .route("/api/v1/admin/logout", post(logout_handler::<S>))
        .route("/api/v1/admin/summary", get(summary_handler::<S>))
        .route("/api/v1/admin/responses.csv", get(export_handler::<S>))
        .with_state(AdminState { store, gate })
}

pub(crate) async fn login_handler<S>(
    State(state): State<AdminState<S>>,
    Json(request): Json<LoginRequest>,
) -> Response
where
    S: ResponseStore + 'static,
{
    match state.gate.login(&request.username, &request.password) {
        Ok(token) => (StatusCode::OK, Json(token)).into_response(),
        Err(err) => auth_error_response(err),
    }
}

pub(crate) async fn logout_handler<S>(
    State(state): State<AdminState<S>>,
    headers: HeaderMap,
) -> Response
where
    S: ResponseStore + 'static,
{
    match bearer_token(&headers) {
        Some(token) if state.gate.logout(token) => StatusCode::NO_CONTENT.into_response(),
        _ => auth_error_response(AuthError::Unauthorized),
    }
}

pub(crate) async fn summary_handler<S>(
    State(state): State<AdminState<S>>,
    headers: HeaderMap,
) -> Response
where
    S: ResponseStore + 'static,
{
    if let Err(err) = authorize(&state, &headers) {
        return auth_error_response(err);
    }
    match state.store.list_all() {
        Ok(records) => {
            let summary = AnalyticsSummary::from_records(&records);
            (StatusCode::OK, Json(summary)).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to read responses for dashboard");
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn export_handler<S>(
    State(state): State<AdminState<S>>,
    headers: HeaderMap,
) -> Response
where
    S: ResponseStore + 'static,
{
    if let Err(err) = authorize(&state, &headers) {
        return auth_error_response(err);
    }
    let mut buffer = Vec::new();
    let exported = state
        .store
        .list_all()
        .and_then(|records| write_csv(&records, &mut buffer));
    match exported {
        Ok(()) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{EXPORT_FILENAME}\""),
                ),
            ],
            buffer,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to export responses");
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

fn authorize<S>(state: &AdminState<S>, headers: &HeaderMap) -> Result<(), AuthError> {
    let token = bearer_token(headers).ok_or(AuthError::Unauthorized)?;
    state.gate.authorize(token)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn auth_error_response(err: AuthError) -> Response {
    let status = match err {
        AuthError::Disabled => StatusCode::FORBIDDEN,
        AuthError::InvalidCredentials | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
        AuthError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
