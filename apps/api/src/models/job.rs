use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::decode_list;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Active,
    Closed,
}

impl JobStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "active" => Some(JobStatus::Active),
            "closed" => Some(JobStatus::Closed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Closed => "closed",
        }
    }
}

/// A job posting owned by one organization. Only `status` changes after creation.
#[derive(Debug, Clone, Serialize)]
pub struct JobPosting {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub title: String,
    pub trade: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub experience_required: i32,
    pub location: String,
    pub salary_min: f64,
    pub salary_max: f64,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub title: String,
    pub trade: String,
    pub description: String,
    pub required_skills: Value,
    pub experience_required: i32,
    pub location: String,
    pub salary_min: f64,
    pub salary_max: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<JobRow> for JobPosting {
    fn from(row: JobRow) -> Self {
        Self {
            id: row.id,
            organization_id: row.organization_id,
            title: row.title,
            trade: row.trade,
            description: row.description,
            required_skills: decode_list(row.required_skills),
            experience_required: row.experience_required,
            location: row.location,
            salary_min: row.salary_min,
            salary_max: row.salary_max,
            // Anything other than "active" is treated as closed.
            status: JobStatus::parse(&row.status).unwrap_or(JobStatus::Closed),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
