use rusqlite::Connection;

use crate::error::AppError;

/// Run the idempotent schema migration.
pub fn run(conn: &Connection) -> Result<(), AppError> {
    tracing::debug!("Running database migrations");

    conn.execute_batch(SCHEMA)?;

    tracing::info!("Database migrations complete");
    Ok(())
}

const SCHEMA: &str = r#"

-- ============================================================================
-- People (one structured JSON record per profile, entries embedded)
-- ============================================================================

CREATE TABLE IF NOT EXISTS dating_people (
    id           TEXT PRIMARY KEY,
    data         TEXT NOT NULL,
    inserted_at  TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_dating_people_inserted ON dating_people(inserted_at);

-- ============================================================================
-- App Settings
-- ============================================================================

CREATE TABLE IF NOT EXISTS app_settings (
    key         TEXT PRIMARY KEY,
    value       TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
"#;
