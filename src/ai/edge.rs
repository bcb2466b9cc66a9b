use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::BackendConfig;
use crate::db::models::{JournalEntry, NoteAnalysis};
use crate::error::AppError;

use super::{Analyst, ChatTurn};

fn ai_err(e: impl std::fmt::Display) -> AppError {
    AppError::Ai(e.to_string())
}

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Serialize)]
struct Invocation<'a, P: Serialize> {
    action: &'a str,
    payload: P,
}

#[derive(Serialize)]
struct NotesPayload<'a> {
    notes: &'a str,
}

/// Entry reduced to the text the model needs.
#[derive(Debug, Serialize)]
struct HistoryItem<'a> {
    date: String,
    rating: u8,
    notes: &'a str,
    flags: Vec<&'a str>,
}

impl<'a> From<&'a JournalEntry> for HistoryItem<'a> {
    fn from(e: &'a JournalEntry) -> Self {
        HistoryItem {
            date: e.date.to_string(),
            rating: e.rating,
            notes: &e.notes,
            flags: e
                .red_flags
                .iter()
                .chain(e.green_flags.iter())
                .map(String::as_str)
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct RelationshipPayload<'a> {
    name: &'a str,
    history: Vec<HistoryItem<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatPayload<'a> {
    history: &'a [ChatTurn],
    new_message: &'a str,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Deserialize)]
struct SummaryResponse {
    summary: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    text: String,
}

#[derive(Deserialize)]
struct FunctionError {
    error: String,
}

// ============================================================================
// EdgeFunctionAnalyst
// ============================================================================

/// Client for the hosted AI function: `POST {endpoint}/functions/v1/{name}`
/// with `{action, payload}`. The model key lives server-side only.
pub struct EdgeFunctionAnalyst {
    http: reqwest::Client,
    url: String,
    credential: String,
}

impl EdgeFunctionAnalyst {
    pub fn new(
        backend: &BackendConfig,
        function: &str,
        timeout: std::time::Duration,
    ) -> Result<Self, AppError> {
        backend.validate()?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ai_err)?;
        Ok(Self {
            http,
            url: backend.function_url(function),
            credential: backend.credential.clone(),
        })
    }

    async fn invoke<P, T>(&self, action: &str, payload: P) -> Result<T, AppError>
    where
        P: Serialize + Send,
        T: DeserializeOwned,
    {
        tracing::debug!(action, "Invoking AI function");
        let resp = self
            .http
            .post(&self.url)
            .header("apikey", &self.credential)
            .bearer_auth(&self.credential)
            .json(&Invocation { action, payload })
            .send()
            .await
            .map_err(ai_err)?;

        let status = resp.status();
        let body = resp.text().await.map_err(ai_err)?;
        if !status.is_success() {
            let message = serde_json::from_str::<FunctionError>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            tracing::warn!(action, %status, error = %message, "AI function returned an error");
            return Err(AppError::Ai(format!("{action} failed ({status}): {message}")));
        }

        serde_json::from_str(&body)
            .map_err(|e| AppError::Ai(format!("{action} returned an unexpected body: {e}")))
    }
}

#[async_trait]
impl Analyst for EdgeFunctionAnalyst {
    async fn analyze_notes(&self, notes: &str) -> Result<NoteAnalysis, AppError> {
        self.invoke("analyze_notes", NotesPayload { notes }).await
    }

    async fn summarize_history(
        &self,
        name: &str,
        entries: &[JournalEntry],
    ) -> Result<String, AppError> {
        let payload = RelationshipPayload {
            name,
            history: entries.iter().map(HistoryItem::from).collect(),
        };
        let resp: SummaryResponse = self.invoke("analyze_relationship", payload).await?;
        Ok(resp.summary)
    }

    async fn chat(&self, prior_turns: &[ChatTurn], message: &str) -> Result<String, AppError> {
        let payload = ChatPayload {
            history: prior_turns,
            new_message: message,
        };
        let resp: ChatResponse = self.invoke("chat", payload).await?;
        Ok(resp.text)
    }
}
