use serde::Serialize;

/// Crate-wide error type. Every fallible function returns `Result<T, AppError>`.
/// Serializes cleanly so a presentation layer gets structured error messages.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The hosted profile table rejected or could not be reached.
    #[error("Backend error: {0}")]
    Backend(String),

    /// The hosted AI function failed or is not configured.
    #[error("AI error: {0}")]
    Ai(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// True for failures of the persistence collaborator (local or hosted).
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            AppError::Database(_) | AppError::Pool(_) | AppError::Backend(_)
        )
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database",
            AppError::Pool(_) => "pool",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation",
            AppError::Io(_) => "io",
            AppError::Serde(_) => "serde",
            AppError::Config(_) => "config",
            AppError::Backend(_) => "backend",
            AppError::Ai(_) => "ai",
            AppError::Internal(_) => "internal",
        }
    }
}

/// Serialized as `{ error: "...", kind: "..." }` for frontend consumption.
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("AppError", 2)?;
        s.serialize_field("error", &self.to_string())?;
        s.serialize_field("kind", self.kind())?;
        s.end()
    }
}
