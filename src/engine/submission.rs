//! Immutable replacement of a profile's entry log.
//!
//! Each function returns a new sequence; the input slice is never mutated.
//! Callers run `aggregate::with_entries` on the result.

use crate::db::models::JournalEntry;
use crate::error::AppError;

/// New entries go first, matching how they are shown before re-sorting.
pub fn insert_entry(entries: &[JournalEntry], entry: JournalEntry) -> Vec<JournalEntry> {
    let mut next = Vec::with_capacity(entries.len() + 1);
    next.push(entry);
    next.extend_from_slice(entries);
    next
}

/// Replace the entry with `id`, keeping its original id and creation timestamp.
pub fn replace_entry(
    entries: &[JournalEntry],
    id: &str,
    replacement: JournalEntry,
) -> Result<Vec<JournalEntry>, AppError> {
    let position = find(entries, id)?;
    let original = &entries[position];

    let mut next = entries.to_vec();
    next[position] = JournalEntry {
        id: original.id.clone(),
        created_at: original.created_at,
        ..replacement
    };
    Ok(next)
}

pub fn remove_entry(entries: &[JournalEntry], id: &str) -> Result<Vec<JournalEntry>, AppError> {
    let position = find(entries, id)?;
    let mut next = entries.to_vec();
    next.remove(position);
    Ok(next)
}

fn find(entries: &[JournalEntry], id: &str) -> Result<usize, AppError> {
    entries
        .iter()
        .position(|e| e.id == id)
        .ok_or_else(|| AppError::NotFound(format!("JournalEntry {id}")))
}
