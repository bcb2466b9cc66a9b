use crate::db::models::{ChatMessage, ChatRole, PersonProfile};
use crate::engine::ordering::timeline;

use super::ChatTurn;

/// Advice chat about one person. Lives only as long as the caller keeps it.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Turns to send ahead of the next message.
    ///
    /// The first exchange of a session is preceded by a context turn
    /// describing the person and their journal.
    pub fn prior_turns(&self, profile: &PersonProfile) -> Vec<ChatTurn> {
        if self.messages.is_empty() {
            return vec![ChatTurn::user(context_preamble(profile))];
        }
        self.messages
            .iter()
            .map(|m| ChatTurn { role: m.role, text: m.text.clone() })
            .collect()
    }

    pub(crate) fn push(&mut self, role: ChatRole, text: impl Into<String>, timestamp: i64) {
        self.messages.push(ChatMessage { role, text: text.into(), timestamp });
    }
}

/// One-line summary of the person and their journal for the model.
pub fn context_preamble(profile: &PersonProfile) -> String {
    let history = timeline(&profile.entries)
        .into_iter()
        .map(|e| {
            let status = e.status.map(|s| s.as_str()).unwrap_or("N/A");
            format!("[{}] Status: {}, Rating {}/10: {}", e.date, status, e.rating, e.notes)
        })
        .collect::<Vec<_>>()
        .join("; ");

    format!(
        "Context for {}: Status: {}. Job: {}. Journal History: {}.",
        profile.name,
        profile.status,
        profile.job_title.as_deref().unwrap_or("N/A"),
        history
    )
}
