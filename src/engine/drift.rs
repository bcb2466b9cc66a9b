use crate::db::models::{DerivedFields, PersonProfile};
use crate::error::AppError;
use crate::store::ProfileStore;

use super::aggregate::recompute;

/// A profile whose stored summary disagrees with its own entry log.
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    /// Scalars as they were stored.
    pub stored: DerivedFields,
    /// Fully recomputed profile to persist.
    pub corrected: PersonProfile,
}

impl Correction {
    pub fn profile_id(&self) -> &str {
        &self.corrected.id
    }
}

/// Compare stored status, rating and date against the entry log.
///
/// Pure. Profiles without entries never drift. Flag unions alone do not
/// count as drift, but a correction carries recomputed unions too.
pub fn detect_drift(profile: &PersonProfile) -> Option<Correction> {
    if profile.entries.is_empty() {
        return None;
    }

    let corrected = recompute(profile);
    let stored = profile.derived();
    if corrected.derived() == stored {
        return None;
    }

    Some(Correction { stored, corrected })
}

/// Persist a correction. Returns the full collection after the write.
pub async fn apply_correction(
    store: &dyn ProfileStore,
    correction: &Correction,
) -> Result<Vec<PersonProfile>, AppError> {
    let expected = correction.corrected.derived();
    tracing::warn!(
        profile_id = %correction.profile_id(),
        stored_status = %correction.stored.status,
        stored_rating = ?correction.stored.latest_rating,
        stored_date = ?correction.stored.last_interaction_date,
        status = %expected.status,
        rating = ?expected.latest_rating,
        date = ?expected.last_interaction_date,
        "Profile summary drifted from its journal; correcting"
    );
    store.upsert(&correction.corrected).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{DateStatus, JournalEntry, Platform};
    use chrono::NaiveDate;

    fn profile_with(entries: Vec<JournalEntry>) -> PersonProfile {
        PersonProfile {
            id: "p1".into(),
            name: "Casey".into(),
            age: None,
            job_title: None,
            company: None,
            phone_number: None,
            platform: Platform::Offline,
            image_url: None,
            status: DateStatus::Matched,
            latest_rating: Some(2),
            last_interaction_date: NaiveDate::from_ymd_opt(2023, 1, 1),
            all_red_flags: vec![],
            all_green_flags: vec![],
            entries,
            ai_summary: None,
        }
    }

    fn entry(status: Option<DateStatus>, rating: u8) -> JournalEntry {
        JournalEntry {
            id: "e1".into(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            rating,
            status,
            notes: String::new(),
            red_flags: vec!["Rude".into()],
            green_flags: vec![],
            created_at: Some(10),
            image_url: None,
        }
    }

    #[test]
    fn test_detects_stale_scalars() {
        let p = profile_with(vec![entry(Some(DateStatus::Dating), 8)]);
        let c = detect_drift(&p).expect("drift");
        assert_eq!(c.stored, p.derived());
        assert_eq!(c.corrected.status, DateStatus::Dating);
        assert_eq!(c.corrected.latest_rating, Some(8));
        assert_eq!(c.corrected.all_red_flags, vec!["Rude"]);
        assert_eq!(c.profile_id(), "p1");
    }

    #[test]
    fn test_corrected_profile_has_no_drift() {
        let p = profile_with(vec![entry(Some(DateStatus::Dating), 8)]);
        let c = detect_drift(&p).unwrap();
        assert!(detect_drift(&c.corrected).is_none());
    }

    #[test]
    fn test_empty_log_never_drifts() {
        assert!(detect_drift(&profile_with(vec![])).is_none());
    }

    #[test]
    fn test_missing_entry_status_is_not_drift() {
        let mut p = profile_with(vec![entry(None, 2)]);
        p.last_interaction_date = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert!(detect_drift(&p).is_none());
    }

    #[test]
    fn test_flag_only_mismatch_is_not_drift() {
        let mut p = profile_with(vec![entry(Some(DateStatus::Matched), 2)]);
        p.last_interaction_date = NaiveDate::from_ymd_opt(2024, 5, 1);
        p.all_red_flags.clear();
        assert!(detect_drift(&p).is_none());
    }
}
