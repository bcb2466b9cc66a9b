use crate::db::models::{DerivedFields, JournalEntry, PersonProfile};

use super::flags::union_flags;
use super::ordering::latest_entry;

/// Scalar fields the profile should carry for its current entry log.
///
/// With no entries there is no latest entry and the stored values stand.
/// A latest entry without a status keeps the profile's known status.
pub fn expected_derived(profile: &PersonProfile) -> DerivedFields {
    let current = profile.derived();
    match latest_entry(&profile.entries) {
        Some(latest) => DerivedFields {
            status: latest.status.unwrap_or(current.status),
            latest_rating: Some(latest.rating),
            last_interaction_date: Some(latest.date),
        },
        None => current,
    }
}

/// Recompute every derived field of `profile` from its own entries.
///
/// Entries are returned untouched, in stored order. Idempotent: the output
/// already satisfies the invariant, so recomputing it again changes nothing.
pub fn recompute(profile: &PersonProfile) -> PersonProfile {
    let derived = expected_derived(profile);
    PersonProfile {
        status: derived.status,
        latest_rating: derived.latest_rating,
        last_interaction_date: derived.last_interaction_date,
        all_red_flags: union_flags(profile.entries.iter().map(|e| e.red_flags.as_slice())),
        all_green_flags: union_flags(profile.entries.iter().map(|e| e.green_flags.as_slice())),
        ..profile.clone()
    }
}

/// Replace the entry log and recompute against it.
pub fn with_entries(profile: &PersonProfile, entries: Vec<JournalEntry>) -> PersonProfile {
    let replaced = PersonProfile {
        entries,
        ..profile.clone()
    };
    recompute(&replaced)
}
