pub mod chat;
pub mod edge;

use async_trait::async_trait;
use serde::Serialize;

use crate::db::models::{ChatRole, JournalEntry, NoteAnalysis};
use crate::error::AppError;

pub use chat::ChatSession;
pub use edge::EdgeFunctionAnalyst;

/// Shown in place of a relationship summary the AI could not produce.
pub const SUMMARY_UNAVAILABLE: &str = "Error connecting to AI backend.";
/// Shown when no AI backend is configured at all.
pub const AI_NOT_CONFIGURED: &str = "Connect a backend to use AI features.";
/// Chat reply used when the AI call fails.
pub const CHAT_UNAVAILABLE: &str =
    "Sorry, I'm having trouble connecting to the backend. Please check your internet or database connection.";

/// One prior chat turn as sent to the AI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: ChatRole::User, text: text.into() }
    }
}

/// AI analysis collaborator. Optional: the engine never depends on it.
#[async_trait]
pub trait Analyst: Send + Sync {
    /// Flags and a 1..10 sentiment score for free-text notes.
    async fn analyze_notes(&self, notes: &str) -> Result<NoteAnalysis, AppError>;

    /// Short narrative over a person's journal.
    async fn summarize_history(
        &self,
        name: &str,
        entries: &[JournalEntry],
    ) -> Result<String, AppError>;

    /// Conversational advice given prior turns and a new message.
    async fn chat(&self, prior_turns: &[ChatTurn], message: &str) -> Result<String, AppError>;
}

/// An AI-produced text, or the placeholder shown instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiReply {
    Generated(String),
    Unavailable(String),
}

impl AiReply {
    pub fn text(&self) -> &str {
        match self {
            AiReply::Generated(t) | AiReply::Unavailable(t) => t,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, AiReply::Generated(_))
    }
}
