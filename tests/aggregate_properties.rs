mod common;

use proptest::prelude::*;

use common::profile;
use dating_journal::db::models::{DateStatus, JournalEntry};
use dating_journal::engine::{detect_drift, latest_entry, recompute, timeline};

fn status() -> impl Strategy<Value = Option<DateStatus>> {
    prop::option::of(prop::sample::select(DateStatus::ALL.to_vec()))
}

fn flags() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(vec!["Late", "Rude", "Kind", "Funny"]), 0..3)
        .prop_map(|v| v.into_iter().map(String::from).collect())
}

prop_compose! {
    fn journal_entry()(
        n in 0u32..1000,
        day in 1u32..6,
        rating in 1u8..=10,
        status in status(),
        created_at in prop::option::of(0i64..4),
        red in flags(),
        green in flags(),
    ) -> JournalEntry {
        JournalEntry {
            id: format!("e{n}"),
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            rating,
            status,
            notes: String::new(),
            red_flags: red,
            green_flags: green,
            created_at,
            image_url: None,
        }
    }
}

proptest! {
    #[test]
    fn recompute_is_idempotent(
        entries in prop::collection::vec(journal_entry(), 0..8),
        stored in prop::sample::select(DateStatus::ALL.to_vec()),
    ) {
        let once = recompute(&profile("p", stored, entries));
        let twice = recompute(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert!(detect_drift(&once).is_none());
    }

    #[test]
    fn timeline_is_sorted_and_stable(entries in prop::collection::vec(journal_entry(), 0..10)) {
        let ordered = timeline(&entries);
        prop_assert_eq!(ordered.len(), entries.len());

        for pair in ordered.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            prop_assert!(a.date >= b.date);
            if a.date == b.date {
                let (ta, tb) = (a.created_at.unwrap_or(0), b.created_at.unwrap_or(0));
                prop_assert!(ta >= tb);
                if ta == tb {
                    let pos = |e: &JournalEntry| entries.iter().position(|x| std::ptr::eq(x, e));
                    prop_assert!(pos(a) < pos(b));
                }
            }
        }

        prop_assert_eq!(latest_entry(&entries), ordered.first().copied());
    }

    #[test]
    fn derived_fields_follow_the_latest_entry(
        entries in prop::collection::vec(journal_entry(), 1..8),
        stored in prop::sample::select(DateStatus::ALL.to_vec()),
    ) {
        let fixed = recompute(&profile("p", stored, entries.clone()));
        let latest = timeline(&entries)[0];
        prop_assert_eq!(fixed.latest_rating, Some(latest.rating));
        prop_assert_eq!(fixed.last_interaction_date, Some(latest.date));
        prop_assert_eq!(fixed.status, latest.status.unwrap_or(stored));
        prop_assert_eq!(&fixed.entries, &entries);
    }
}
