use crate::chat::ChatService;
use crate::config::Config;
use crate::session::{Session, SessionId, SessionStore};
use crate::types::Message;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub chat: ChatService,
}

// API Request/Response types

#[derive(Debug, serde::Serialize)]
pub struct CreateSessionResponse {
    pub session_id: SessionId,
}

#[derive(Debug, serde::Serialize)]
pub struct DocumentSummary {
    pub file_name: String,
    pub characters: usize,
}

/// Everything the UI needs to re-render one session.
#[derive(Debug, serde::Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub messages: Vec<Message>,
    pub documents: Vec<DocumentSummary>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id,
            created_at: session.created_at,
            messages: session.messages().to_vec(),
            documents: session
                .documents()
                .iter()
                .map(|d| DocumentSummary {
                    file_name: d.file_name.clone(),
                    characters: d.text.chars().count(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, serde::Serialize)]
pub struct ChatResponse {
    /// The assistant's reply
    pub text: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, serde::Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub sessions: usize,
}
