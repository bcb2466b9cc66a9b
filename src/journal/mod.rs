pub mod draft;

use std::sync::Arc;

use uuid::Uuid;

use crate::ai::{AiReply, Analyst, ChatSession, AI_NOT_CONFIGURED, CHAT_UNAVAILABLE, SUMMARY_UNAVAILABLE};
use crate::db::models::{ChatRole, NoteAnalysis, PersonProfile};
use crate::engine::ordering::timeline;
use crate::engine::submission::{insert_entry, remove_entry, replace_entry};
use crate::engine::{apply_correction, detect_drift, recompute, with_entries};
use crate::error::AppError;
use crate::stats::DashboardStats;
use crate::store::{splice, ProfileStore};
use crate::validation::{require_non_empty, require_valid_id};

pub use draft::{EntryDraft, EntryTarget, NewPerson, ProfileEdit};

use draft::non_blank;

/// Placeholder portrait for people added without a photo.
pub fn default_avatar(name: &str) -> String {
    format!(
        "https://picsum.photos/seed/{}/400/400",
        urlencoding::encode(name)
    )
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// ============================================================================
// Results
// ============================================================================

/// A persisted mutation: the saved profile and the collection after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub profile: PersonProfile,
    pub people: Vec<PersonProfile>,
}

/// Result of looking at one profile. `corrected` is set when its summary
/// had drifted and was rewritten.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub profile: PersonProfile,
    pub people: Vec<PersonProfile>,
    pub corrected: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepairReport {
    /// Ids of profiles whose summary was rewritten.
    pub corrected: Vec<String>,
    pub people: Vec<PersonProfile>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRefresh {
    pub summary: AiReply,
    /// Present only when a generated summary was saved.
    pub update: Option<Update>,
}

// ============================================================================
// Journal
// ============================================================================

/// One user's journal session: the store, the optional AI collaborator and
/// the in-memory collection.
///
/// Mutations update memory first, then persist. A failed write returns the
/// error and leaves memory ahead of storage; the next observation of that
/// profile heals whatever the store still holds.
pub struct Journal {
    store: Arc<dyn ProfileStore>,
    analyst: Option<Arc<dyn Analyst>>,
    people: Vec<PersonProfile>,
}

impl Journal {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self {
            store,
            analyst: None,
            people: Vec::new(),
        }
    }

    pub fn with_analyst(mut self, analyst: Arc<dyn Analyst>) -> Self {
        self.analyst = Some(analyst);
        self
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    // --------------------------------------------------------------------
    // Reads
    // --------------------------------------------------------------------

    /// Replace memory with what the store holds. Does not write.
    pub async fn load(&mut self) -> Result<&[PersonProfile], AppError> {
        self.people = self.store.list().await?;
        tracing::info!(
            backend = self.store.backend_name(),
            count = self.people.len(),
            "Journal loaded"
        );
        Ok(&self.people)
    }

    pub fn people(&self) -> &[PersonProfile] {
        &self.people
    }

    pub fn person(&self, id: &str) -> Option<&PersonProfile> {
        self.people.iter().find(|p| p.id == id)
    }

    pub fn dashboard(&self) -> DashboardStats {
        DashboardStats::compute(&self.people)
    }

    fn require(&self, id: &str) -> Result<&PersonProfile, AppError> {
        require_valid_id("person id", id)?;
        self.person(id)
            .ok_or_else(|| AppError::NotFound(format!("Person {id}")))
    }

    // --------------------------------------------------------------------
    // Profile lifecycle
    // --------------------------------------------------------------------

    pub async fn create_person(&mut self, input: NewPerson) -> Result<Update, AppError> {
        require_non_empty("name", &input.name)?;
        let name = input.name.trim().to_string();

        let entries = input
            .initial_entry
            .map(|d| vec![d.into_entry(Uuid::new_v4().to_string(), Some(now_millis()))])
            .unwrap_or_default();
        let image_url = non_blank(input.image_url).unwrap_or_else(|| default_avatar(&name));

        let profile = recompute(&PersonProfile {
            id: Uuid::new_v4().to_string(),
            name,
            age: input.age,
            job_title: non_blank(input.job_title),
            company: non_blank(input.company),
            phone_number: non_blank(input.phone_number),
            platform: input.platform,
            image_url: Some(image_url),
            status: input.status,
            latest_rating: None,
            last_interaction_date: None,
            all_red_flags: Vec::new(),
            all_green_flags: Vec::new(),
            entries,
            ai_summary: None,
        });

        tracing::info!(profile_id = %profile.id, entries = profile.entries.len(), "Creating person");
        self.persist(profile).await
    }

    /// Replace profile metadata. Entries and derived fields are untouched.
    pub async fn edit_profile(&mut self, id: &str, edit: ProfileEdit) -> Result<Update, AppError> {
        require_non_empty("name", &edit.name)?;
        let current = self.require(id)?;
        let name = edit.name.trim().to_string();
        let image_url = non_blank(edit.image_url).unwrap_or_else(|| default_avatar(&name));

        let profile = PersonProfile {
            name,
            platform: edit.platform,
            age: edit.age,
            job_title: non_blank(edit.job_title),
            company: non_blank(edit.company),
            phone_number: non_blank(edit.phone_number),
            image_url: Some(image_url),
            ..current.clone()
        };
        self.persist(profile).await
    }

    /// Delete a person with all their entries. Returns the remaining people.
    pub async fn delete_person(&mut self, id: &str) -> Result<Vec<PersonProfile>, AppError> {
        self.require(id)?;
        self.people.retain(|p| p.id != id);

        match self.store.delete(id).await {
            Ok(people) => {
                tracing::info!(profile_id = %id, "Person deleted");
                self.people = people.clone();
                Ok(people)
            }
            Err(e) => {
                tracing::error!(profile_id = %id, error = %e, "Failed to delete person");
                Err(e)
            }
        }
    }

    // --------------------------------------------------------------------
    // Entries
    // --------------------------------------------------------------------

    /// Save a draft as a new entry or over an existing one, then recompute
    /// and persist the profile.
    pub async fn submit_entry(
        &mut self,
        id: &str,
        target: EntryTarget,
        draft: EntryDraft,
    ) -> Result<Update, AppError> {
        let current = self.require(id)?;

        let entries = match target {
            EntryTarget::New => {
                let entry = draft.into_entry(Uuid::new_v4().to_string(), Some(now_millis()));
                tracing::debug!(profile_id = %id, entry_id = %entry.id, "Adding journal entry");
                insert_entry(&current.entries, entry)
            }
            EntryTarget::Edit(entry_id) => {
                tracing::debug!(profile_id = %id, entry_id = %entry_id, "Editing journal entry");
                let entry = draft.into_entry(entry_id.clone(), None);
                replace_entry(&current.entries, &entry_id, entry)?
            }
        };

        let profile = with_entries(current, entries);
        self.persist(profile).await
    }

    pub async fn delete_entry(&mut self, id: &str, entry_id: &str) -> Result<Update, AppError> {
        let current = self.require(id)?;
        let entries = remove_entry(&current.entries, entry_id)?;
        tracing::debug!(profile_id = %id, entry_id = %entry_id, "Removing journal entry");

        let profile = with_entries(current, entries);
        self.persist(profile).await
    }

    // --------------------------------------------------------------------
    // Observation and repair
    // --------------------------------------------------------------------

    /// Look at one profile, correcting and saving it if its summary drifted.
    pub async fn open_person(&mut self, id: &str) -> Result<Observation, AppError> {
        let current = self.require(id)?;

        let Some(correction) = detect_drift(current) else {
            return Ok(Observation {
                profile: current.clone(),
                people: self.people.clone(),
                corrected: false,
            });
        };

        self.people = splice(std::mem::take(&mut self.people), &correction.corrected);
        let people = apply_correction(self.store.as_ref(), &correction)
            .await
            .inspect_err(|e| {
                tracing::error!(profile_id = %id, error = %e, "Failed to save corrected profile");
            })?;
        self.people = people.clone();

        Ok(Observation {
            profile: correction.corrected,
            people,
            corrected: true,
        })
    }

    /// Check every loaded profile and save the ones that drifted.
    pub async fn repair_all(&mut self) -> Result<RepairReport, AppError> {
        let corrections: Vec<_> = self.people.iter().filter_map(detect_drift).collect();
        let mut report = RepairReport::default();

        for correction in corrections {
            self.people = splice(std::mem::take(&mut self.people), &correction.corrected);
            self.people = apply_correction(self.store.as_ref(), &correction).await?;
            report.corrected.push(correction.profile_id().to_string());
        }

        tracing::info!(
            checked = self.people.len(),
            corrected = report.corrected.len(),
            "Journal repair finished"
        );
        report.people = self.people.clone();
        Ok(report)
    }

    // --------------------------------------------------------------------
    // AI
    // --------------------------------------------------------------------

    /// Run note analysis over a draft and fold the result in.
    ///
    /// Returns `None` without calling out when the notes are blank. On error
    /// the draft is unchanged.
    pub async fn analyze_draft(
        &self,
        draft: &mut EntryDraft,
    ) -> Result<Option<NoteAnalysis>, AppError> {
        if draft.notes.trim().is_empty() {
            return Ok(None);
        }
        let analyst = self
            .analyst
            .as_ref()
            .ok_or_else(|| AppError::Ai(AI_NOT_CONFIGURED.into()))?;

        let analysis = analyst.analyze_notes(&draft.notes).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Note analysis failed");
        })?;
        draft.apply_analysis(&analysis);
        Ok(Some(analysis))
    }

    /// Ask for a fresh relationship summary and save it on success.
    ///
    /// Without an analyst, or when the call fails, a placeholder comes back
    /// and nothing is written.
    pub async fn refresh_summary(&mut self, id: &str) -> Result<SummaryRefresh, AppError> {
        let current = self.require(id)?.clone();

        let Some(analyst) = self.analyst.clone() else {
            return Ok(SummaryRefresh {
                summary: AiReply::Unavailable(AI_NOT_CONFIGURED.into()),
                update: None,
            });
        };

        let history: Vec<_> = timeline(&current.entries).into_iter().cloned().collect();
        match analyst.summarize_history(&current.name, &history).await {
            Ok(summary) => {
                let profile = PersonProfile {
                    ai_summary: Some(summary.clone()),
                    ..current
                };
                let update = self.persist(profile).await?;
                Ok(SummaryRefresh {
                    summary: AiReply::Generated(summary),
                    update: Some(update),
                })
            }
            Err(e) => {
                tracing::warn!(profile_id = %id, error = %e, "Relationship summary unavailable");
                Ok(SummaryRefresh {
                    summary: AiReply::Unavailable(SUMMARY_UNAVAILABLE.into()),
                    update: None,
                })
            }
        }
    }

    /// Send one chat message about a person and record both turns.
    pub async fn chat(
        &self,
        id: &str,
        session: &mut ChatSession,
        message: &str,
    ) -> Result<AiReply, AppError> {
        require_non_empty("message", message)?;
        let profile = self.require(id)?;
        let prior = session.prior_turns(profile);
        session.push(ChatRole::User, message.trim(), now_millis());

        let reply = match &self.analyst {
            None => AiReply::Unavailable(AI_NOT_CONFIGURED.into()),
            Some(analyst) => match analyst.chat(&prior, message.trim()).await {
                Ok(text) => AiReply::Generated(text),
                Err(e) => {
                    tracing::warn!(profile_id = %id, error = %e, "Chat reply unavailable");
                    AiReply::Unavailable(CHAT_UNAVAILABLE.into())
                }
            },
        };

        session.push(ChatRole::Model, reply.text(), now_millis());
        Ok(reply)
    }

    // --------------------------------------------------------------------
    // Persistence
    // --------------------------------------------------------------------

    async fn persist(&mut self, profile: PersonProfile) -> Result<Update, AppError> {
        self.people = splice(std::mem::take(&mut self.people), &profile);

        match self.store.upsert(&profile).await {
            Ok(people) => {
                self.people = people.clone();
                Ok(Update { profile, people })
            }
            Err(e) => {
                tracing::error!(
                    profile_id = %profile.id,
                    backend = self.store.backend_name(),
                    error = %e,
                    "Failed to save profile"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_test_db;
    use crate::db::models::{DateStatus, Platform};
    use crate::store::LocalProfileStore;
    use chrono::NaiveDate;

    fn journal() -> Journal {
        Journal::new(Arc::new(LocalProfileStore::new(init_test_db().unwrap())))
    }

    fn draft(day: u32, rating: i64, status: DateStatus) -> EntryDraft {
        let mut d = EntryDraft::new(NaiveDate::from_ymd_opt(2024, 6, day).unwrap(), Some(status));
        d.set_rating(rating);
        d
    }

    #[test]
    fn test_default_avatar_encodes_name() {
        assert_eq!(
            default_avatar("Ana María"),
            "https://picsum.photos/seed/Ana%20Mar%C3%ADa/400/400"
        );
    }

    #[tokio::test]
    async fn test_create_person_without_entry() {
        let mut journal = journal();
        let mut input = NewPerson::named("  Sky Chen ");
        input.platform = Platform::Hinge;
        input.status = DateStatus::Talking;
        input.company = Some("   ".into());

        let update = journal.create_person(input).await.unwrap();
        let p = &update.profile;
        assert_eq!(p.name, "Sky Chen");
        assert_eq!(p.status, DateStatus::Talking);
        assert_eq!(p.latest_rating, None);
        assert_eq!(p.last_interaction_date, None);
        assert_eq!(p.company, None);
        assert_eq!(p.image_url.as_deref(), Some("https://picsum.photos/seed/Sky%20Chen/400/400"));
        assert_eq!(journal.people().len(), 1);
    }

    #[tokio::test]
    async fn test_create_person_rejects_blank_name() {
        let mut journal = journal();
        let err = journal.create_person(NewPerson::named("  ")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(journal.people().is_empty());
    }

    #[tokio::test]
    async fn test_create_person_with_initial_entry_derives_fields() {
        let mut journal = journal();
        let mut input = NewPerson::named("Rae");
        input.status = DateStatus::Matched;
        let mut first = draft(2, 8, DateStatus::Dating);
        first.pending_green_flag = "Punctual".into();
        input.initial_entry = Some(first);

        let p = journal.create_person(input).await.unwrap().profile;
        assert_eq!(p.status, DateStatus::Dating);
        assert_eq!(p.latest_rating, Some(8));
        assert_eq!(p.all_green_flags, vec!["Punctual".to_string()]);
        assert!(p.entries[0].created_at.is_some());
    }

    #[tokio::test]
    async fn test_edit_profile_keeps_derived_fields() {
        let mut journal = journal();
        let mut input = NewPerson::named("Lee");
        input.initial_entry = Some(draft(4, 6, DateStatus::Talking));
        let created = journal.create_person(input).await.unwrap().profile;

        let edit = ProfileEdit {
            name: "Lee Park".into(),
            platform: Platform::Offline,
            age: Some(31),
            job_title: Some("Nurse".into()),
            company: None,
            phone_number: None,
            image_url: Some("https://img.example/lee.png".into()),
        };
        let edited = journal.edit_profile(&created.id, edit).await.unwrap().profile;
        assert_eq!(edited.name, "Lee Park");
        assert_eq!(edited.age, Some(31));
        assert_eq!(edited.derived(), created.derived());
        assert_eq!(edited.entries, created.entries);
    }

    #[tokio::test]
    async fn test_unknown_person_is_not_found() {
        let mut journal = journal();
        let err = journal
            .submit_entry("nope", EntryTarget::New, draft(1, 5, DateStatus::Dating))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(matches!(journal.delete_person("nope").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_load_reads_without_writing() {
        let mut journal = journal();
        journal.create_person(NewPerson::named("Kai")).await.unwrap();
        journal.people.clear();

        let loaded = journal.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(journal.dashboard().total_people, 1);
    }

    #[tokio::test]
    async fn test_load_survives_legacy_and_broken_rows() {
        let pool = init_test_db().unwrap();
        {
            let conn = pool.get().unwrap();
            conn.execute_batch(
                r#"INSERT INTO dating_people (id, data, inserted_at, updated_at) VALUES
                   ('ok', '{"id":"ok","name":"Ira","status":"Talking"}', '2024-01-02', '2024-01-02'),
                   ('old', '{"id":"old","name":"Bo","status":null,"entries":[{"id":"e1","date":"2023-05-01","rating":6,"status":"dating"}]}', '2024-01-01', '2024-01-01'),
                   ('bad', 'not json', '2024-01-03', '2024-01-03');"#,
            )
            .unwrap();
        }

        let mut journal = Journal::new(Arc::new(LocalProfileStore::new(pool)));
        let ids: Vec<String> = journal.load().await.unwrap().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec!["ok", "old"]);

        let healed = journal.open_person("old").await.unwrap();
        assert!(healed.corrected);
        assert_eq!(healed.profile.status, DateStatus::Dating);
    }

    #[tokio::test]
    async fn test_delete_person() {
        let mut journal = journal();
        let a = journal.create_person(NewPerson::named("A")).await.unwrap().profile;
        journal.create_person(NewPerson::named("B")).await.unwrap();

        let remaining = journal.delete_person(&a.id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(journal.person(&a.id).is_none());
    }

    #[tokio::test]
    async fn test_ai_features_without_analyst() {
        let mut journal = journal();
        let p = journal.create_person(NewPerson::named("Noa")).await.unwrap().profile;

        let refresh = journal.refresh_summary(&p.id).await.unwrap();
        assert_eq!(refresh.summary, AiReply::Unavailable(AI_NOT_CONFIGURED.into()));
        assert!(refresh.update.is_none());

        let mut d = draft(1, 5, DateStatus::Dating);
        d.notes = "Great talk".into();
        assert!(matches!(journal.analyze_draft(&mut d).await, Err(AppError::Ai(_))));

        let mut blank = draft(1, 5, DateStatus::Dating);
        assert_eq!(journal.analyze_draft(&mut blank).await.unwrap(), None);

        let mut session = ChatSession::new();
        let reply = journal.chat(&p.id, &mut session, "hi").await.unwrap();
        assert!(!reply.is_generated());
        assert_eq!(session.messages().len(), 2);
    }
}
