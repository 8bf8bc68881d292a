//! HTTP boundary.
//!
//! The boundary is thin plumbing: it validates uploads, registers jobs, and
//! answers point reads against the store. It never blocks on job
//! completion — clients poll `GET /jobs/{id}`.

mod routes;

use crate::error::RecapError;
use crate::job::types::JobFlags;
use crate::job::{JobQueue, JobStore};
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Largest accepted upload, in bytes.
const MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JobStore>,
    pub queue: JobQueue,
    /// Feature flags applied when the request leaves them unset.
    pub default_flags: JobFlags,
}

/// Build the service router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/jobs", post(routes::create_job))
        .route("/jobs/:id", get(routes::get_job))
        .route("/jobs/:id/cancel", post(routes::cancel_job))
        .route("/jobs/:id/export", get(routes::export_job))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Error surface of the HTTP boundary: a status code and a JSON body
/// `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }
}

impl From<RecapError> for ApiError {
    fn from(err: RecapError) -> Self {
        let status = match &err {
            RecapError::UnsupportedFormat { .. } => StatusCode::BAD_REQUEST,
            RecapError::JobNotFound { .. } => StatusCode::NOT_FOUND,
            RecapError::QueueFull => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "request failed");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
