use chrono::NaiveDate;

use crate::db::models::{DateStatus, JournalEntry, NoteAnalysis, Platform};
use crate::engine::flags::{commit_pending, merge_unique};
use crate::validation::clamp_rating;

/// Rating a fresh draft starts with.
pub const DEFAULT_DRAFT_RATING: u8 = 5;

/// Which entry a submitted draft is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryTarget {
    New,
    /// Replace the entry with this id.
    Edit(String),
}

// ============================================================================
// Entry draft
// ============================================================================

/// An entry being written or edited, plus the manual-flag input buffers.
///
/// Text left in `pending_red_flag`/`pending_green_flag` is committed to the
/// flag lists when the draft becomes an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub date: NaiveDate,
    rating: u8,
    pub status: Option<DateStatus>,
    pub notes: String,
    pub red_flags: Vec<String>,
    pub green_flags: Vec<String>,
    pub image_url: Option<String>,
    pub pending_red_flag: String,
    pub pending_green_flag: String,
}

impl EntryDraft {
    pub fn new(date: NaiveDate, status: Option<DateStatus>) -> Self {
        Self {
            date,
            rating: DEFAULT_DRAFT_RATING,
            status,
            notes: String::new(),
            red_flags: Vec::new(),
            green_flags: Vec::new(),
            image_url: None,
            pending_red_flag: String::new(),
            pending_green_flag: String::new(),
        }
    }

    /// Draft dated today (UTC).
    pub fn today(status: Option<DateStatus>) -> Self {
        Self::new(chrono::Utc::now().date_naive(), status)
    }

    /// Pre-filled from an existing entry for editing. Legacy entries without
    /// a status pick up the profile's current one.
    pub fn from_entry(entry: &JournalEntry, profile_status: DateStatus) -> Self {
        Self {
            date: entry.date,
            rating: entry.rating,
            status: Some(entry.status.unwrap_or(profile_status)),
            notes: entry.notes.clone(),
            red_flags: entry.red_flags.clone(),
            green_flags: entry.green_flags.clone(),
            image_url: entry.image_url.clone(),
            pending_red_flag: String::new(),
            pending_green_flag: String::new(),
        }
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn set_rating(&mut self, value: i64) {
        self.rating = clamp_rating(value);
    }

    pub fn add_red_flag(&mut self, label: &str) {
        push_label(&mut self.red_flags, label);
    }

    pub fn add_green_flag(&mut self, label: &str) {
        push_label(&mut self.green_flags, label);
    }

    pub fn remove_red_flag(&mut self, label: &str) {
        self.red_flags.retain(|f| f != label);
    }

    pub fn remove_green_flag(&mut self, label: &str) {
        self.green_flags.retain(|f| f != label);
    }

    /// Fold an AI analysis in: flags merged after existing ones, rating set
    /// from the sentiment score.
    pub fn apply_analysis(&mut self, analysis: &NoteAnalysis) {
        merge_unique(&mut self.red_flags, &analysis.red_flags);
        merge_unique(&mut self.green_flags, &analysis.green_flags);
        self.set_rating(analysis.sentiment_score);
    }

    /// Commit both pending buffers, then build the entry.
    pub fn into_entry(mut self, id: String, created_at: Option<i64>) -> JournalEntry {
        commit_pending(&mut self.red_flags, &mut self.pending_red_flag);
        commit_pending(&mut self.green_flags, &mut self.pending_green_flag);
        JournalEntry {
            id,
            date: self.date,
            rating: self.rating,
            status: self.status,
            notes: self.notes,
            red_flags: self.red_flags,
            green_flags: self.green_flags,
            created_at,
            image_url: self.image_url.filter(|u| !u.trim().is_empty()),
        }
    }
}

fn push_label(list: &mut Vec<String>, label: &str) {
    let label = label.trim();
    if !label.is_empty() {
        list.push(label.to_string());
    }
}

// ============================================================================
// Profile inputs
// ============================================================================

/// Input for adding a person, optionally with their first entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPerson {
    pub name: String,
    pub platform: Platform,
    pub status: DateStatus,
    pub age: Option<u32>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub phone_number: Option<String>,
    pub image_url: Option<String>,
    pub initial_entry: Option<EntryDraft>,
}

impl NewPerson {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platform: Platform::default(),
            status: DateStatus::default(),
            age: None,
            job_title: None,
            company: None,
            phone_number: None,
            image_url: None,
            initial_entry: None,
        }
    }
}

/// Editable profile metadata. Status and the other derived fields follow
/// the journal and are not part of it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileEdit {
    pub name: String,
    pub platform: Platform,
    pub age: Option<u32>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub phone_number: Option<String>,
    pub image_url: Option<String>,
}

/// Blank optional text reads as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
