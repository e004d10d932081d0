use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "pending" => Some(ApplicationStatus::Pending),
            "approved" => Some(ApplicationStatus::Approved),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// Join between one worker and one job. At most one per (worker, job) pair.
#[derive(Debug, Clone, Serialize)]
pub struct Application {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub job_id: Uuid,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn new(worker_id: Uuid, job_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            worker_id,
            job_id,
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub job_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ApplicationRow> for Application {
    fn from(row: ApplicationRow) -> Self {
        Self {
            id: row.id,
            worker_id: row.worker_id,
            job_id: row.job_id,
            status: ApplicationStatus::parse(&row.status).unwrap_or(ApplicationStatus::Pending),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_three_statuses_are_legal() {
        assert_eq!(ApplicationStatus::parse("approved"), Some(ApplicationStatus::Approved));
        assert_eq!(ApplicationStatus::parse("hired"), None);
        assert_eq!(ApplicationStatus::parse(""), None);
    }

    #[test]
    fn test_new_application_starts_pending() {
        let app = Application::new(Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(app.status, ApplicationStatus::Pending);
    }
}
