//! Note and session models shared across notewise crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Which AI feature is running against a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessType {
    /// Summary generation.
    Summary,
    /// Tag generation.
    Tags,
}

impl ProcessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Tags => "tags",
        }
    }
}

impl fmt::Display for ProcessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's note, including any AI-generated fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub content: String,
    /// AI-generated summary, if one has been produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// AI-generated tags.
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Create a new note owned by `owner_id` with no AI fields.
    pub fn new(owner_id: Uuid, title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            owner_id,
            title: title.into(),
            content: content.into(),
            summary: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `principal` may run AI operations on this note.
    pub fn is_owned_by(&self, principal: &Principal) -> bool {
        self.owner_id == principal.user_id
    }
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: Uuid,
}

impl Principal {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_type_serialization() {
        assert_eq!(
            serde_json::to_value(ProcessType::Summary).unwrap(),
            "summary"
        );
        assert_eq!(serde_json::to_value(ProcessType::Tags).unwrap(), "tags");
    }

    #[test]
    fn test_process_type_deserialization() {
        let pt: ProcessType = serde_json::from_str("\"tags\"").unwrap();
        assert_eq!(pt, ProcessType::Tags);
        assert!(serde_json::from_str::<ProcessType>("\"title\"").is_err());
    }

    #[test]
    fn test_process_type_display() {
        assert_eq!(ProcessType::Summary.to_string(), "summary");
        assert_eq!(ProcessType::Tags.to_string(), "tags");
    }

    #[test]
    fn test_note_new_has_no_ai_fields() {
        let owner = Uuid::new_v4();
        let note = Note::new(owner, "회의록", "오늘 회의 내용");
        assert_eq!(note.owner_id, owner);
        assert!(note.summary.is_none());
        assert!(note.tags.is_empty());
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn test_note_ownership() {
        let owner = Principal::new(Uuid::new_v4());
        let stranger = Principal::new(Uuid::new_v4());
        let note = Note::new(owner.user_id, "t", "c");
        assert!(note.is_owned_by(&owner));
        assert!(!note.is_owned_by(&stranger));
    }

    #[test]
    fn test_note_serialization_skips_missing_summary() {
        let note = Note::new(Uuid::new_v4(), "t", "c");
        let json = serde_json::to_value(&note).unwrap();
        assert!(json.get("summary").is_none());
        assert_eq!(json["tags"], serde_json::json!([]));
    }
}
