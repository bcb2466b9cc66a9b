use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::BackendConfig;
use crate::db::models::PersonProfile;
use crate::error::AppError;

use super::{splice, ProfileStore};

pub const PEOPLE_TABLE: &str = "dating_people";

/// PostgREST code for "relation does not exist".
const UNDEFINED_TABLE: &str = "42P01";

// ============================================================================
// Helper
// ============================================================================

/// Convert any displayable error into `AppError::Backend`.
fn backend_err(e: impl std::fmt::Display) -> AppError {
    AppError::Backend(e.to_string())
}

// ============================================================================
// Wire types
// ============================================================================

/// Rows are decoded one by one so a single bad record is skipped, not fatal.
#[derive(Deserialize)]
struct PeopleRow {
    data: serde_json::Value,
}

impl PeopleRow {
    fn decode(self) -> Option<PersonProfile> {
        let id = self.data.get("id").cloned();
        serde_json::from_value(self.data)
            .inspect_err(|e| {
                tracing::warn!(id = ?id, error = %e, "Skipping undecodable hosted profile row");
            })
            .ok()
    }
}

#[derive(Serialize)]
struct UpsertRow<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
    data: &'a PersonProfile,
    updated_at: String,
}

#[derive(Deserialize, Default)]
struct PostgrestError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

// ============================================================================
// CloudProfileStore
// ============================================================================

/// Hosted profile table behind a PostgREST endpoint.
///
/// Rows are `{id, user_id, data, updated_at}` where `data` is the whole
/// profile record. The credential goes out both as `apikey` and as bearer
/// token, so it must be a key the table accepts for writes. Tables whose
/// row-level security compares `auth.uid()` with `user_id` also need
/// `BackendConfig::user_id` set and a user-scoped credential; signing in is
/// left to the caller.
pub struct CloudProfileStore {
    http: reqwest::Client,
    backend: BackendConfig,
}

impl CloudProfileStore {
    pub fn new(backend: BackendConfig, timeout: std::time::Duration) -> Result<Self, AppError> {
        backend.validate()?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(backend_err)?;
        Ok(Self { http, backend })
    }

    // --------------------------------------------------------------------
    // Private HTTP helpers
    // --------------------------------------------------------------------

    /// Build an authenticated request against the people table.
    fn authed(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.backend.rest_url(PEOPLE_TABLE))
            .header("apikey", &self.backend.credential)
            .bearer_auth(&self.backend.credential)
    }

    /// Send a request and turn non-success statuses into `AppError::Backend`.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, AppError> {
        let resp = req.send().await.map_err(backend_err)?;
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let detail: PostgrestError = serde_json::from_str(&body).unwrap_or_default();
        tracing::error!(%status, code = ?detail.code, "Hosted profile table request failed");

        if detail.code.as_deref() == Some(UNDEFINED_TABLE) {
            return Err(AppError::Backend(format!(
                "Table '{PEOPLE_TABLE}' does not exist. Run the SQL setup script in your backend dashboard."
            )));
        }
        Err(AppError::Backend(format!(
            "{status}: {}",
            detail.message.unwrap_or(body)
        )))
    }
}

#[async_trait]
impl ProfileStore for CloudProfileStore {
    fn backend_name(&self) -> &'static str {
        "cloud"
    }

    /// `GET /rest/v1/dating_people?select=data`
    async fn list(&self) -> Result<Vec<PersonProfile>, AppError> {
        let req = self
            .authed(reqwest::Method::GET)
            .query(&[("select", "data")]);
        let rows: Vec<PeopleRow> = self.send(req).await?.json().await.map_err(backend_err)?;
        Ok(rows.into_iter().filter_map(PeopleRow::decode).collect())
    }

    /// `POST /rest/v1/dating_people` with merge-duplicates resolution.
    async fn upsert(&self, profile: &PersonProfile) -> Result<Vec<PersonProfile>, AppError> {
        let current = self.list().await?;

        let req = self
            .authed(reqwest::Method::POST)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&UpsertRow {
                id: &profile.id,
                user_id: self.backend.user_id.as_deref(),
                data: profile,
                updated_at: chrono::Utc::now().to_rfc3339(),
            });
        self.send(req).await?;
        tracing::debug!(profile_id = %profile.id, "Profile saved to hosted table");

        Ok(splice(current, profile))
    }

    /// `DELETE /rest/v1/dating_people?id=eq.{id}`
    async fn delete(&self, id: &str) -> Result<Vec<PersonProfile>, AppError> {
        let current = self.list().await?;

        let req = self
            .authed(reqwest::Method::DELETE)
            .query(&[("id", format!("eq.{id}"))]);
        self.send(req).await?;

        Ok(current.into_iter().filter(|p| p.id != id).collect())
    }
}
