//! Builds the message list sent to the model for one user turn.
//!
//! Layout: the fixed system persona, then (when any document exists) a
//! single user message holding every document's text, then the new user
//! message. Earlier transcript turns are not replayed.

use crate::session::Document;
use crate::types::Message;

pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";
pub const DOCUMENT_PREFIX: &str = "Full document text: ";

pub fn assemble(documents: &[Document], user_message: &str) -> Vec<Message> {
    let mut messages = vec![Message::system(SYSTEM_PROMPT)];

    if !documents.is_empty() {
        let combined = documents
            .iter()
            .map(|d| d.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        messages.push(Message::user(format!("{}{}", DOCUMENT_PREFIX, combined)));
    }

    messages.push(Message::user(user_message));
    messages
}
