//! Deterministic order over journal entries.
//!
//! Newest first: calendar date descending, then creation timestamp
//! descending. Legacy entries without a timestamp compare as `0`, so they
//! land after every timestamped entry of the same day. Stored order is
//! never trusted; both the timeline and "the latest entry" derive from here.

use std::cmp::Ordering;

use crate::db::models::JournalEntry;

/// Total order, newest first. `Less` means `a` comes before `b`.
pub fn compare_entries(a: &JournalEntry, b: &JournalEntry) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.created_at.unwrap_or(0).cmp(&a.created_at.unwrap_or(0)))
}

/// The journal timeline: every entry, newest first.
///
/// `sort_by` is stable, so entries equal in both keys keep their input order.
pub fn timeline(entries: &[JournalEntry]) -> Vec<&JournalEntry> {
    let mut ordered: Vec<&JournalEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| compare_entries(a, b));
    ordered
}

/// Head of the timeline, or `None` for an empty log.
///
/// `min_by` returns the first of several equal minima, which is the element
/// a stable sort would put first.
pub fn latest_entry(entries: &[JournalEntry]) -> Option<&JournalEntry> {
    entries.iter().min_by(|a, b| compare_entries(a, b))
}
