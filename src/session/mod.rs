//! Per-user session state
//!
//! A session owns the chat transcript, the extracted documents and the
//! names of files already processed. Sessions are created explicitly and
//! live until they are ended or the process exits.

pub mod store;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::types::Message;

pub use store::SessionStore;

pub type SessionId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub file_name: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    messages: Vec<Message>,
    documents: Vec<Document>,
    processed_file_names: HashSet<String>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            messages: Vec::new(),
            documents: Vec::new(),
            processed_file_names: HashSet::new(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn has_processed(&self, file_name: &str) -> bool {
        self.processed_file_names.contains(file_name)
    }

    /// Record an extracted document. Returns `false` (and records nothing)
    /// when a file with the same name was already processed.
    pub fn add_document(&mut self, file_name: impl Into<String>, text: impl Into<String>) -> bool {
        let file_name = file_name.into();
        if !self.processed_file_names.insert(file_name.clone()) {
            return false;
        }
        self.documents.push(Document {
            file_name,
            text: text.into(),
        });
        true
    }

    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Empty the transcript. Documents are kept.
    pub fn clear_transcript(&mut self) {
        self.messages.clear();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
