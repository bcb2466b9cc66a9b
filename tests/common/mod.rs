#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use dating_journal::ai::{Analyst, ChatTurn};
use dating_journal::db::models::{
    DateStatus, JournalEntry, NoteAnalysis, PersonProfile, Platform,
};
use dating_journal::store::ProfileStore;
use dating_journal::AppError;

// ============================================================================
// Stores
// ============================================================================

/// In-memory store that counts writes and can be told to fail them.
#[derive(Default)]
pub struct RecordingStore {
    people: Mutex<Vec<PersonProfile>>,
    upserts: AtomicUsize,
    fail_writes: AtomicBool,
}

impl RecordingStore {
    pub fn with(people: Vec<PersonProfile>) -> Self {
        Self {
            people: Mutex::new(people),
            ..Self::default()
        }
    }

    pub fn upserts(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn stored(&self, id: &str) -> Option<PersonProfile> {
        self.people.lock().unwrap().iter().find(|p| p.id == id).cloned()
    }
}

#[async_trait]
impl ProfileStore for RecordingStore {
    fn backend_name(&self) -> &'static str {
        "recording"
    }

    async fn list(&self) -> Result<Vec<PersonProfile>, AppError> {
        Ok(self.people.lock().unwrap().clone())
    }

    async fn upsert(&self, profile: &PersonProfile) -> Result<Vec<PersonProfile>, AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Backend("connection reset".into()));
        }
        self.upserts.fetch_add(1, Ordering::SeqCst);
        let mut people = self.people.lock().unwrap();
        match people.iter().position(|p| p.id == profile.id) {
            Some(i) => people[i] = profile.clone(),
            None => people.insert(0, profile.clone()),
        }
        Ok(people.clone())
    }

    async fn delete(&self, id: &str) -> Result<Vec<PersonProfile>, AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Backend("connection reset".into()));
        }
        let mut people = self.people.lock().unwrap();
        people.retain(|p| p.id != id);
        Ok(people.clone())
    }
}

// ============================================================================
// Analysts
// ============================================================================

/// Analyst returning canned answers, or failing every call.
pub struct ScriptedAnalyst {
    pub analysis: NoteAnalysis,
    pub summary: String,
    pub reply: String,
    pub fail: bool,
    pub chat_calls: Mutex<Vec<(Vec<ChatTurn>, String)>>,
}

impl ScriptedAnalyst {
    pub fn answering() -> Self {
        Self {
            analysis: NoteAnalysis {
                red_flags: vec!["Talked about ex".into()],
                green_flags: vec!["Curious".into()],
                summary: "Promising but cautious".into(),
                sentiment_score: 7,
            },
            summary: "Steady and warm.".into(),
            reply: "Ask them about the trip.".into(),
            fail: false,
            chat_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::answering()
        }
    }

    fn check(&self) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::Ai("function timed out".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Analyst for ScriptedAnalyst {
    async fn analyze_notes(&self, _notes: &str) -> Result<NoteAnalysis, AppError> {
        self.check()?;
        Ok(self.analysis.clone())
    }

    async fn summarize_history(
        &self,
        _name: &str,
        _entries: &[JournalEntry],
    ) -> Result<String, AppError> {
        self.check()?;
        Ok(self.summary.clone())
    }

    async fn chat(&self, prior_turns: &[ChatTurn], message: &str) -> Result<String, AppError> {
        self.chat_calls
            .lock()
            .unwrap()
            .push((prior_turns.to_vec(), message.to_string()));
        self.check()?;
        Ok(self.reply.clone())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

pub fn entry(
    id: &str,
    on: &str,
    rating: u8,
    status: Option<DateStatus>,
    created_at: Option<i64>,
) -> JournalEntry {
    JournalEntry {
        id: id.into(),
        date: date(on),
        rating,
        status,
        notes: format!("notes {id}"),
        red_flags: vec![],
        green_flags: vec![],
        created_at,
        image_url: None,
    }
}

pub fn profile(id: &str, status: DateStatus, entries: Vec<JournalEntry>) -> PersonProfile {
    PersonProfile {
        id: id.into(),
        name: format!("Person {id}"),
        age: Some(29),
        job_title: Some("Designer".into()),
        company: None,
        phone_number: None,
        platform: Platform::Hinge,
        image_url: None,
        status,
        latest_rating: None,
        last_interaction_date: None,
        all_red_flags: vec![],
        all_green_flags: vec![],
        entries,
        ai_summary: None,
    }
}
