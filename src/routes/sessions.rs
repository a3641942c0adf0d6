use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::info;

use crate::models::{AppState, CreateSessionResponse, SessionView};
use crate::routes::session_handle;
use crate::session::SessionId;
use crate::types::{AppError, AppResult};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", get(get_session).delete(end_session))
        .route("/api/sessions/{id}/messages", delete(clear_messages))
}

async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = state.sessions.create().await;
    info!(session_id = %session_id, "Session created");
    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<Json<SessionView>> {
    let handle = session_handle(&state, id).await?;
    let session = handle.lock().await;
    Ok(Json(SessionView::from(&*session)))
}

async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<StatusCode> {
    if !state.sessions.remove(&id).await {
        return Err(AppError::SessionNotFound(id));
    }
    info!(session_id = %id, "Session ended");
    Ok(StatusCode::NO_CONTENT)
}

/// Empty the transcript; uploaded documents stay.
async fn clear_messages(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<Json<SessionView>> {
    let handle = session_handle(&state, id).await?;
    let mut session = handle.lock().await;
    session.clear_transcript();
    info!(session_id = %id, documents = session.documents().len(), "Transcript cleared");
    Ok(Json(SessionView::from(&*session)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request};

    use crate::llm::provider::testing::ScriptedClient;
    use crate::routes::create_router;
    use crate::routes::tests::{chat, create_session, part, send, test_state, upload, view};

    use super::*;

    #[tokio::test]
    async fn test_new_session_is_empty() {
        let app = create_router(test_state(Arc::new(ScriptedClient::default())));
        let id = create_session(&app).await;

        let (status, body) = view(&app, &id).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session_id"], id.as_str());
        assert!(body["messages"].as_array().unwrap().is_empty());
        assert!(body["documents"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_keeps_documents() {
        let client = Arc::new(ScriptedClient::replying(vec![Ok("answer")]));
        let app = create_router(test_state(client));
        let id = create_session(&app).await;

        upload(
            &app,
            &id,
            &[part("a.txt", "text/plain", b"alpha"), part("b.txt", "text/plain", b"beta")],
        )
        .await;
        chat(&app, &id, "question").await;
        let (_, before) = view(&app, &id).await;

        let (status, after) = send(
            &app,
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/api/sessions/{}/messages", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(after["messages"].as_array().unwrap().is_empty());
        assert_eq!(after["documents"], before["documents"]);
        assert_eq!(after["documents"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_end_session() {
        let app = create_router(test_state(Arc::new(ScriptedClient::default())));
        let id = create_session(&app).await;

        let end = || {
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/api/sessions/{}", id))
                .body(Body::empty())
                .unwrap()
        };

        let (status, _) = send(&app, end()).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = view(&app, &id).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, end()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
