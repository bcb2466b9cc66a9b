use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::db::repos::core::settings;
use crate::db::settings_keys::{BACKEND_CREDENTIAL, BACKEND_ENDPOINT};
use crate::db::DbPool;
use crate::error::AppError;
use crate::validation::require_http_endpoint;

const ENV_DATA_DIR: &str = "DATING_JOURNAL_DATA_DIR";
const ENV_BACKEND_URL: &str = "DATING_JOURNAL_BACKEND_URL";
const ENV_BACKEND_KEY: &str = "DATING_JOURNAL_BACKEND_KEY";
const ENV_BACKEND_USER: &str = "DATING_JOURNAL_BACKEND_USER";

pub const DEFAULT_AI_FUNCTION: &str = "gemini-api";

// ============================================================================
// Backend connection
// ============================================================================

/// Hosted backend connection: base URL plus client credential.
///
/// Passed explicitly to the hosted store and AI client; there is no global
/// client handle.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct BackendConfig {
    pub endpoint: String,
    pub credential: String,
    /// Owner written into hosted rows. Tables guarded by row-level
    /// security on `user_id` reject rows without it.
    #[serde(default)]
    pub user_id: Option<String>,
}

impl BackendConfig {
    pub fn new(endpoint: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim().trim_end_matches('/').to_string(),
            credential: credential.into().trim().to_string(),
            user_id: None,
        }
    }

    pub fn with_user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        require_http_endpoint(&self.endpoint)?;
        if self.credential.is_empty() {
            return Err(AppError::Config("backend credential is empty".into()));
        }
        Ok(())
    }

    /// `{endpoint}/rest/v1/{table}`
    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.endpoint, table)
    }

    /// `{endpoint}/functions/v1/{name}`
    pub fn function_url(&self, name: &str) -> String {
        format!("{}/functions/v1/{}", self.endpoint, name)
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("endpoint", &self.endpoint)
            .field("credential", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}

// ============================================================================
// Application config
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub backend: Option<BackendConfig>,
    /// Name of the hosted AI function.
    pub ai_function: String,
    pub request_timeout_secs: u64,
    pub log_to_file: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: None,
            ai_function: DEFAULT_AI_FUNCTION.to_string(),
            request_timeout_secs: 30,
            log_to_file: false,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dating-journal")
}

impl AppConfig {
    /// Load from an optional TOML file, then apply environment overrides.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut config = match path {
            Some(p) if p.exists() => Self::from_toml(&std::fs::read_to_string(p)?)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, AppError> {
        let mut config: AppConfig =
            toml::from_str(raw).map_err(|e| AppError::Config(format!("invalid config file: {e}")))?;
        config.backend = config
            .backend
            .map(|b| BackendConfig::new(b.endpoint, b.credential).with_user_id(b.user_id));
        Ok(config)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }

        let endpoint = var(ENV_BACKEND_URL).filter(|v| !v.trim().is_empty());
        let credential = var(ENV_BACKEND_KEY).filter(|v| !v.trim().is_empty());
        let user_id = var(ENV_BACKEND_USER).filter(|v| !v.trim().is_empty());
        if endpoint.is_none() && credential.is_none() && user_id.is_none() {
            return;
        }

        let current = self.backend.take();
        let endpoint = endpoint.or_else(|| current.as_ref().map(|b| b.endpoint.clone()));
        let credential = credential.or_else(|| current.as_ref().map(|b| b.credential.clone()));
        let user_id = user_id.or_else(|| current.as_ref().and_then(|b| b.user_id.clone()));
        self.backend = match (endpoint, credential) {
            (Some(e), Some(c)) => Some(BackendConfig::new(e, c).with_user_id(user_id)),
            _ => current,
        };
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

// ============================================================================
// Stored backend settings
// ============================================================================

/// Effective backend: values saved in `app_settings` win over `defaults`.
///
/// A stored endpoint that is not an http(s) URL is ignored rather than
/// allowed to block the defaults. Endpoint and credential fall back
/// independently. Returns `None` when no valid, complete config results.
pub fn resolve_backend(
    pool: &DbPool,
    defaults: Option<&BackendConfig>,
) -> Result<Option<BackendConfig>, AppError> {
    let stored_endpoint = settings::get(pool, BACKEND_ENDPOINT)?.filter(|url| {
        let valid = require_http_endpoint(url).is_ok();
        if !valid {
            tracing::warn!(endpoint = %url, "Ignoring stored backend endpoint that is not an http(s) URL");
        }
        valid
    });
    let stored_credential = settings::get(pool, BACKEND_CREDENTIAL)?;

    let endpoint = stored_endpoint.or_else(|| defaults.map(|d| d.endpoint.clone()));
    let credential = stored_credential.or_else(|| defaults.map(|d| d.credential.clone()));

    let resolved = match (endpoint, credential) {
        (Some(e), Some(c)) => {
            BackendConfig::new(e, c).with_user_id(defaults.and_then(|d| d.user_id.clone()))
        }
        _ => return Ok(None),
    };

    match resolved.validate() {
        Ok(()) => Ok(Some(resolved)),
        Err(e) => {
            tracing::warn!(error = %e, "Backend configuration present but invalid; using local storage");
            Ok(None)
        }
    }
}

/// Validate and store a backend config so it survives restarts.
pub fn save_backend(pool: &DbPool, backend: &BackendConfig) -> Result<(), AppError> {
    let backend = BackendConfig::new(backend.endpoint.clone(), backend.credential.clone());
    backend.validate()?;
    settings::set(pool, BACKEND_ENDPOINT, &backend.endpoint)?;
    settings::set(pool, BACKEND_CREDENTIAL, &backend.credential)?;
    tracing::info!(endpoint = %backend.endpoint, "Backend configuration saved");
    Ok(())
}

/// Forget any stored backend config.
pub fn clear_backend(pool: &DbPool) -> Result<(), AppError> {
    settings::delete(pool, BACKEND_ENDPOINT)?;
    settings::delete(pool, BACKEND_CREDENTIAL)?;
    Ok(())
}
