use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::decode_list;
use crate::models::language::Language;

/// Who said a transcript line. Stored as `user` / `assistant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    #[serde(rename = "user", alias = "worker")]
    Worker,
    #[serde(rename = "assistant", alias = "model")]
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Speaker,
    pub content: String,
}

impl ChatTurn {
    pub fn worker(content: impl Into<String>) -> Self {
        Self {
            role: Speaker::Worker,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Speaker::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkHistoryEntry {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub duration: String,
}

/// A worker's profile, keyed by phone number.
///
/// `resume_complete` is private: it can only be raised through
/// [`WorkerProfile::mark_resume_complete`] and never lowered.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerProfile {
    pub id: Uuid,
    pub phone: String,
    pub name: Option<String>,
    pub trade: Option<String>,
    pub experience_years: Option<i32>,
    pub location: Option<String>,
    pub language: Language,
    pub skills: Vec<String>,
    pub education: Option<String>,
    pub certifications: Option<String>,
    pub work_history: Vec<WorkHistoryEntry>,
    pub transcript: Vec<ChatTurn>,
    resume_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkerProfile {
    pub fn new(phone: impl Into<String>, language: Language) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            phone: phone.into(),
            name: None,
            trade: None,
            experience_years: None,
            location: None,
            language,
            skills: Vec::new(),
            education: None,
            certifications: None,
            work_history: Vec::new(),
            transcript: Vec::new(),
            resume_complete: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn resume_complete(&self) -> bool {
        self.resume_complete
    }

    pub fn mark_resume_complete(&mut self) {
        self.resume_complete = true;
    }
}

/// Raw `workers` row. JSON columns are decoded leniently into the profile.
#[derive(Debug, Clone, FromRow)]
pub struct WorkerRow {
    pub id: Uuid,
    pub phone: String,
    pub name: Option<String>,
    pub trade: Option<String>,
    pub experience_years: Option<i32>,
    pub location: Option<String>,
    pub language: String,
    pub skills: Value,
    pub education: Option<String>,
    pub certifications: Option<String>,
    pub work_history: Value,
    pub chat_history: Value,
    pub resume_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WorkerRow> for WorkerProfile {
    fn from(row: WorkerRow) -> Self {
        Self {
            id: row.id,
            phone: row.phone,
            name: row.name,
            trade: row.trade,
            experience_years: row.experience_years,
            location: row.location,
            language: Language::from_stored(&row.language),
            skills: decode_list(row.skills),
            education: row.education,
            certifications: row.certifications,
            work_history: decode_list(row.work_history),
            transcript: decode_list(row.chat_history),
            resume_complete: row.resume_complete,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
