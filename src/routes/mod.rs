//! API Routes
//!
//! - `/` - bundled single-page UI
//! - `/api/health` - health check
//! - `/api/sessions` - create, inspect and end sessions
//! - `/api/sessions/{id}/files` - document upload
//! - `/api/sessions/{id}/messages` - clear the transcript
//! - `/api/sessions/{id}/chat` - ask a question

pub mod chat;
pub mod files;
pub mod health;
pub mod sessions;
pub mod ui;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::middleware::apply_cors;
use crate::models::{AppState, ErrorBody, ErrorResponse};
use crate::session::store::SessionHandle;
use crate::session::SessionId;
use crate::types::{AppError, AppResult};

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let max_upload_bytes = state.config.server.max_upload_bytes;
    let allowed_origins = state.config.server.cors_allowed_origins.clone();

    let router = Router::new()
        .merge(sessions::router())
        .merge(files::router())
        .merge(chat::router())
        .merge(health::router())
        .merge(ui::router())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    apply_cors(router, &allowed_origins)
}

/// Look up a session or fail with 404.
pub(crate) async fn session_handle(state: &AppState, id: SessionId) -> AppResult<SessionHandle> {
    state
        .sessions
        .get(&id)
        .await
        .ok_or(AppError::SessionNotFound(id))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            AppError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "session_not_found"),
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            AppError::Completion(e) => (StatusCode::BAD_GATEWAY, e.kind()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        }

        let body = ErrorResponse {
            error: ErrorBody {
                kind: kind.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
