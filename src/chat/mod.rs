//! Chat Service
//!
//! Drives the two user events that change a session: uploading files and
//! submitting a message. Callers hold the session's lock for the whole event.

pub mod assembler;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::extract::{extract_text, FileKind};
use crate::llm::{CompletionClient, CompletionRequest, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::session::Session;
use crate::types::{AppError, AppResult, Message};

pub const UPLOAD_SUCCESS_NOTICE: &str = "Files uploaded and processed!";

/// One file from an upload request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    Processed {
        file_name: String,
        kind: FileKind,
        characters: usize,
    },
    Skipped {
        file_name: String,
    },
    Unsupported {
        file_name: String,
    },
    Failed {
        file_name: String,
        error: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub files: Vec<FileOutcome>,
    pub notice: String,
}

#[derive(Clone)]
pub struct ChatService {
    client: Arc<dyn CompletionClient>,
    model: String,
    temperature: f32,
}

impl ChatService {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Extract every file not seen before in this session. A file that fails
    /// to extract is reported and left out; the rest of the batch proceeds.
    pub async fn ingest(&self, session: &mut Session, files: Vec<UploadedFile>) -> UploadReport {
        let mut outcomes = Vec::with_capacity(files.len());

        for file in files {
            if session.has_processed(&file.file_name) {
                debug!(file_name = %file.file_name, "File already processed, skipping");
                outcomes.push(FileOutcome::Skipped {
                    file_name: file.file_name,
                });
                continue;
            }

            let kind = FileKind::for_upload(file.content_type.as_deref(), &file.file_name);
            let UploadedFile { file_name, bytes, .. } = file;
            let extracted = tokio::task::spawn_blocking(move || extract_text(kind, &bytes)).await;

            let outcome = match (kind, extracted) {
                (_, Err(join_error)) => FileOutcome::Failed {
                    file_name,
                    error: join_error.to_string(),
                },
                (_, Ok(Err(e))) => {
                    warn!(file_name = %file_name, error = %e, "Extraction failed");
                    FileOutcome::Failed {
                        file_name,
                        error: e.to_string(),
                    }
                }
                (None, Ok(Ok(text))) => {
                    warn!(file_name = %file_name, "Unsupported file type, recording empty text");
                    session.add_document(file_name.clone(), text);
                    FileOutcome::Unsupported { file_name }
                }
                (Some(kind), Ok(Ok(text))) => {
                    let characters = text.chars().count();
                    info!(file_name = %file_name, kind = ?kind, characters, "Document extracted");
                    session.add_document(file_name.clone(), text);
                    FileOutcome::Processed {
                        file_name,
                        kind,
                        characters,
                    }
                }
            };
            outcomes.push(outcome);
        }

        let notice = upload_notice(&outcomes);
        UploadReport {
            files: outcomes,
            notice,
        }
    }

    /// Record the user's message, ask the model, and record its answer.
    ///
    /// The user message stays in the transcript even when the completion
    /// fails; in that case no assistant message is added.
    pub async fn submit(&self, session: &mut Session, message: &str) -> AppResult<String> {
        if message.trim().is_empty() {
            return Err(AppError::InvalidRequest("message must not be empty".to_string()));
        }

        session.push_message(Message::user(message));

        debug!(documents = session.documents().len(), "Assembling completion request");
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: assembler::assemble(session.documents(), message),
            temperature: self.temperature,
        };

        match self.client.complete(&request).await {
            Ok(completion) => {
                info!(
                    session_id = %session.id,
                    reply_len = completion.content.len(),
                    "Completion received"
                );
                session.push_message(Message::assistant(completion.content.clone()));
                Ok(completion.content)
            }
            Err(e) => {
                warn!(session_id = %session.id, kind = e.kind(), error = %e, "Completion failed");
                Err(e.into())
            }
        }
    }
}

fn upload_notice(outcomes: &[FileOutcome]) -> String {
    let failed = outcomes
        .iter()
        .filter(|o| matches!(o, FileOutcome::Failed { .. }))
        .count();
    if failed == 0 {
        UPLOAD_SUCCESS_NOTICE.to_string()
    } else {
        format!(
            "Processed {} of {} files; {} could not be read.",
            outcomes.len() - failed,
            outcomes.len(),
            failed
        )
    }
}
