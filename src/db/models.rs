use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

// ============================================================================
// Enumerations
// ============================================================================

/// Relationship stage, recorded per entry and mirrored on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum DateStatus {
    #[default]
    Matched,
    Talking,
    Dating,
    Situationship,
    Ghosted,
    Rejected,
    Friendzoned,
    Partner,
}

impl DateStatus {
    pub const ALL: [DateStatus; 8] = [
        DateStatus::Matched,
        DateStatus::Talking,
        DateStatus::Dating,
        DateStatus::Situationship,
        DateStatus::Ghosted,
        DateStatus::Rejected,
        DateStatus::Friendzoned,
        DateStatus::Partner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DateStatus::Matched => "Matched",
            DateStatus::Talking => "Talking",
            DateStatus::Dating => "Dating",
            DateStatus::Situationship => "Situationship",
            DateStatus::Ghosted => "Ghosted",
            DateStatus::Rejected => "Rejected",
            DateStatus::Friendzoned => "Friendzoned",
            DateStatus::Partner => "Partner",
        }
    }
}

impl std::fmt::Display for DateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the match came from. Unknown labels from storage read as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Platform {
    #[default]
    Tinder,
    Bumble,
    Hinge,
    #[serde(rename = "CMB")]
    Cmb,
    Lamu,
    Offline,
    #[serde(other)]
    Other,
}

/// Lenient status decoding for stored records.
///
/// Legacy data carries no status, `null`, `""`, labels in other casing or
/// values that are not strings at all. Known labels match case-insensitively;
/// anything else reads as "no status" instead of failing the record.
fn parse_stored_status(raw: Option<serde_json::Value>) -> Option<DateStatus> {
    let label = match raw {
        None | Some(serde_json::Value::Null) => return None,
        Some(serde_json::Value::String(label)) => label,
        Some(other) => {
            tracing::warn!(value = %other, "Ignoring non-string status in stored record");
            return None;
        }
    };
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    let status = DateStatus::ALL
        .iter()
        .find(|s| s.as_str().eq_ignore_ascii_case(label))
        .copied();
    if status.is_none() {
        tracing::warn!(label = %label, "Ignoring unknown status label in stored record");
    }
    status
}

fn entry_status<'de, D>(deserializer: D) -> Result<Option<DateStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<serde_json::Value>::deserialize(deserializer).map(parse_stored_status)
}

/// Profile status as stored: `null` or unreadable falls back to the default.
fn profile_status<'de, D>(deserializer: D) -> Result<DateStatus, D::Error>
where
    D: Deserializer<'de>,
{
    entry_status(deserializer).map(Option::unwrap_or_default)
}

// ============================================================================
// Journal Entry
// ============================================================================

/// One recorded interaction. Owned by its profile; replaced whole on edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    #[ts(type = "string")]
    pub date: NaiveDate,
    pub rating: u8,
    #[serde(
        default,
        deserialize_with = "entry_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<DateStatus>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub green_flags: Vec<String>,
    /// Milliseconds since epoch. Absent on legacy records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

// ============================================================================
// Person Profile
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PersonProfile {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    // Derived from the entry log.
    #[serde(default, deserialize_with = "profile_status")]
    pub status: DateStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub last_interaction_date: Option<NaiveDate>,
    #[serde(default)]
    pub all_red_flags: Vec<String>,
    #[serde(default)]
    pub all_green_flags: Vec<String>,

    #[serde(default)]
    pub entries: Vec<JournalEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
}

impl PersonProfile {
    /// The three scalar fields the drift check compares.
    pub fn derived(&self) -> DerivedFields {
        DerivedFields {
            status: self.status,
            latest_rating: self.latest_rating,
            last_interaction_date: self.last_interaction_date,
        }
    }

    /// First word of the name, for compact chart labels.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// Scalar summary fields mirrored from the latest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DerivedFields {
    pub status: DateStatus,
    pub latest_rating: Option<u8>,
    #[ts(type = "string | null")]
    pub last_interaction_date: Option<NaiveDate>,
}

// ============================================================================
// AI chat
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: i64,
}

/// Structured result of AI note analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NoteAnalysis {
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub green_flags: Vec<String>,
    #[serde(default)]
    pub summary: String,
    pub sentiment_score: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_json_uses_camel_case_keys() {
        let json = r#"{
            "id": "p1",
            "name": "Alex Rivera",
            "platform": "Hinge",
            "status": "Talking",
            "latestRating": 7,
            "lastInteractionDate": "2024-03-02",
            "allRedFlags": ["Late"],
            "allGreenFlags": [],
            "entries": [{
                "id": "e1",
                "date": "2024-03-02",
                "rating": 7,
                "status": "Talking",
                "notes": "Coffee",
                "redFlags": ["Late"],
                "greenFlags": [],
                "createdAt": 1709370000000
            }]
        }"#;

        let profile: PersonProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.platform, Platform::Hinge);
        assert_eq!(profile.latest_rating, Some(7));
        assert_eq!(profile.entries[0].created_at, Some(1_709_370_000_000));
        assert_eq!(profile.first_name(), "Alex");

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["lastInteractionDate"], "2024-03-02");
        assert_eq!(back["entries"][0]["redFlags"][0], "Late");
        assert!(back.get("aiSummary").is_none());
    }

    #[test]
    fn test_legacy_entry_without_status_or_timestamp() {
        let json = r#"{"id":"e1","date":"2023-12-01","rating":4,"status":"","notes":""}"#;
        let entry: JournalEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.status, None);
        assert_eq!(entry.created_at, None);
        assert!(entry.red_flags.is_empty());

        let missing: JournalEntry =
            serde_json::from_str(r#"{"id":"e2","date":"2023-12-02","rating":4}"#).unwrap();
        assert_eq!(missing.status, None);
    }

    #[test]
    fn test_malformed_entry_status_reads_as_none() {
        let other_case: JournalEntry = serde_json::from_str(
            r#"{"id":"e1","date":"2023-12-01","rating":4,"status":"dating"}"#,
        )
        .unwrap();
        assert_eq!(other_case.status, Some(DateStatus::Dating));

        for raw in [r#""Engaged""#, "null", "7", r#"["Dating"]"#] {
            let json = format!(r#"{{"id":"e1","date":"2023-12-01","rating":4,"status":{raw}}}"#);
            let entry: JournalEntry = serde_json::from_str(&json).unwrap();
            assert_eq!(entry.status, None, "status {raw}");
        }
    }

    #[test]
    fn test_null_or_unknown_profile_status_uses_default() {
        let null: PersonProfile =
            serde_json::from_str(r#"{"id":"p1","name":"Sam","status":null}"#).unwrap();
        assert_eq!(null.status, DateStatus::Matched);

        let unknown: PersonProfile =
            serde_json::from_str(r#"{"id":"p1","name":"Sam","status":"Married"}"#).unwrap();
        assert_eq!(unknown.status, DateStatus::Matched);
    }

    #[test]
    fn test_platform_labels() {
        assert_eq!(serde_json::to_string(&Platform::Cmb).unwrap(), "\"CMB\"");
        let unknown: Platform = serde_json::from_str("\"Feeld\"").unwrap();
        assert_eq!(unknown, Platform::Other);
    }
}
