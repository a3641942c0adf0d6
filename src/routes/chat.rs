use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use tracing::info;

use crate::models::{AppState, ChatRequest, ChatResponse};
use crate::routes::session_handle;
use crate::session::SessionId;
use crate::types::AppResult;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/sessions/{id}/chat", post(post_chat))
}

/// Run one full turn: record the question, ask the model, record the answer.
/// A failed completion comes back as a 502 error body; the question stays in
/// the transcript.
pub async fn post_chat(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    info!(session_id = %id, message_len = request.message.len(), "Received chat request");

    let handle = session_handle(&state, id).await?;
    let mut session = handle.lock().await;
    let text = state.chat.submit(&mut session, &request.message).await?;

    Ok(Json(ChatResponse {
        text,
        messages: session.messages().to_vec(),
    }))
}
