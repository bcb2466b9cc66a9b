use rusqlite::{params, OptionalExtension};

use crate::db::models::PersonProfile;
use crate::db::DbPool;
use crate::error::AppError;

/// Profiles are stored whole as JSON; the row only indexes id and timestamps.
fn decode(id: &str, data: &str) -> Result<PersonProfile, AppError> {
    serde_json::from_str(data).map_err(|e| {
        tracing::error!(id = %id, error = %e, "Stored profile is not valid JSON");
        AppError::Serde(e)
    })
}

/// All profiles, most recently inserted first.
///
/// Rows whose JSON no longer decodes are logged and skipped so one bad
/// record cannot hide the rest.
pub fn get_all(pool: &DbPool) -> Result<Vec<PersonProfile>, AppError> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, data FROM dating_people ORDER BY inserted_at DESC, rowid DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut people = Vec::new();
    for row in rows {
        let (id, data) = row?;
        match decode(&id, &data) {
            Ok(profile) => people.push(profile),
            Err(_) => tracing::warn!(id = %id, "Skipping undecodable profile row"),
        }
    }
    Ok(people)
}

pub fn get_by_id(pool: &DbPool, id: &str) -> Result<PersonProfile, AppError> {
    let conn = pool.get()?;
    let data: Option<String> = conn
        .query_row(
            "SELECT data FROM dating_people WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;

    match data {
        Some(data) => decode(id, &data),
        None => Err(AppError::NotFound(format!("PersonProfile {id}"))),
    }
}

/// Insert or replace by id. Replacing keeps the original insertion position.
pub fn upsert(pool: &DbPool, profile: &PersonProfile) -> Result<(), AppError> {
    let data = serde_json::to_string(profile)?;
    let now = chrono::Utc::now().to_rfc3339();

    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO dating_people (id, data, inserted_at, updated_at)
         VALUES (?1, ?2, ?3, ?3)
         ON CONFLICT(id) DO UPDATE SET data = ?2, updated_at = ?3",
        params![profile.id, data, now],
    )?;
    Ok(())
}

/// Delete a profile and its embedded entries. Returns true if a row was deleted.
pub fn delete(pool: &DbPool, id: &str) -> Result<bool, AppError> {
    let conn = pool.get()?;
    let rows = conn.execute("DELETE FROM dating_people WHERE id = ?1", params![id])?;
    Ok(rows > 0)
}
