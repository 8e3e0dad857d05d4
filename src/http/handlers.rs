use super::state::AppState;
use crate::classifier::ClassifyError;
use crate::session::LifecycleError;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub owner_id: String,
    /// The practice prompt/topic this recording is for.
    pub prompt_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    /// Client-measured duration, used when the stored encoding cannot be
    /// decoded server-side.
    pub duration_secs: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /sessions
/// Create a new practice session in the recording state
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> impl IntoResponse {
    match state.lifecycle.create(&req.owner_id, &req.prompt_id).await {
        Ok(session) => (StatusCode::CREATED, Json(session)).into_response(),
        Err(e) => lifecycle_error(e),
    }
}

/// GET /sessions/:session_id
/// Get the current state of a session
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match state.lifecycle.session(&session_id).await {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(e) => lifecycle_error(e),
    }
}

/// POST /sessions/:session_id/audio
/// Upload the finished recording and complete the session
pub async fn upload_audio(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    info!(
        session_id = %session_id,
        bytes = body.len(),
        content_type = %content_type,
        "Upload received"
    );

    match state
        .lifecycle
        .upload(&session_id, &body, &content_type, params.duration_secs)
        .await
    {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(e) => lifecycle_error(e),
    }
}

/// POST /sessions/:session_id/analyze
/// Run classification on the uploaded recording
pub async fn analyze_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match state.lifecycle.analyze(&session_id).await {
        Ok(analysis) => (StatusCode::OK, Json(analysis)).into_response(),
        Err(e) => lifecycle_error(e),
    }
}

/// GET /owners/:owner_id/analyses
/// Dashboard listing: analyses joined with playback URLs and durations
pub async fn list_owner_analyses(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> impl IntoResponse {
    match state.lifecycle.dashboard(&owner_id).await {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => lifecycle_error(e),
    }
}

/// GET /owners/:owner_id/trends
/// Chart-ready trend points and per-category deltas
pub async fn get_owner_trends(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> impl IntoResponse {
    match state.lifecycle.trends(&owner_id).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => lifecycle_error(e),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Map pipeline failures onto status codes the clients can act on: 409 for
/// precondition and double-submit violations, 422 when the classifier refused
/// the payload (re-record, don't retry), 502 when it was merely unavailable.
fn lifecycle_error(err: LifecycleError) -> Response {
    let status = match &err {
        LifecycleError::NotFound(_) => StatusCode::NOT_FOUND,
        LifecycleError::InvalidState { .. }
        | LifecycleError::DuplicateUpload(_)
        | LifecycleError::AnalysisInFlight(_) => StatusCode::CONFLICT,
        LifecycleError::MissingRecording(_) => StatusCode::CONFLICT,
        LifecycleError::Classifier(ClassifyError::PayloadRejected(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        LifecycleError::Classifier(ClassifyError::Transient(_)) => StatusCode::BAD_GATEWAY,
        LifecycleError::Capture(_)
        | LifecycleError::Upload(_)
        | LifecycleError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    error!(status = %status, error = %err, "Request failed");

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}
