//! Job & Application Registry: postings owned by organizations and the
//! worker applications against them.

pub mod handlers;

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::db::{is_unique_violation, ApplicationExt, JobExt, OrganizationExt, Store, WorkerExt};
use crate::errors::AppError;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::job::{JobPosting, JobStatus};
use crate::models::worker::WorkerProfile;
use crate::validation::{missing_fields, sanitize_input};

/// Skills arrive either as a list or as one comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Text(String),
}

impl SkillsInput {
    fn into_skills(self) -> Vec<String> {
        let raw = match self {
            SkillsInput::List(items) => items,
            SkillsInput::Text(text) => text.split(',').map(str::to_string).collect(),
        };
        raw.iter()
            .map(|s| sanitize_input(s))
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Numbers from form posts may arrive as strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

impl NumberInput {
    fn value(&self, field: &str) -> Result<Option<f64>, AppError> {
        let value = match self {
            NumberInput::Number(n) => *n,
            NumberInput::Text(s) if s.trim().is_empty() => return Ok(None),
            NumberInput::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| AppError::Validation(format!("{field} must be a number")))?,
        };
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::Validation(format!("{field} must be a non-negative number")));
        }
        Ok(Some(value))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewJobRequest {
    pub title: Option<String>,
    pub trade: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub required_skills: Option<SkillsInput>,
    pub experience_required: Option<NumberInput>,
    pub salary_min: Option<NumberInput>,
    pub salary_max: Option<NumberInput>,
}

fn number(input: &Option<NumberInput>, field: &str) -> Result<f64, AppError> {
    match input {
        Some(n) => Ok(n.value(field)?.unwrap_or(0.0)),
        None => Ok(0.0),
    }
}

/// Validates a posting request into a new active job. Nothing is written.
pub fn build_job(organization_id: Uuid, req: NewJobRequest) -> Result<JobPosting, AppError> {
    let title = req.title.as_deref().map(sanitize_input);
    let trade = req.trade.as_deref().map(sanitize_input);
    let description = req.description.as_deref().map(sanitize_input);
    let location = req.location.as_deref().map(sanitize_input);

    let missing = missing_fields(&[
        ("title", title.as_deref()),
        ("trade", trade.as_deref()),
        ("description", description.as_deref()),
        ("location", location.as_deref()),
    ]);
    if !missing.is_empty() {
        return Err(AppError::MissingFields(missing));
    }

    let experience = number(&req.experience_required, "experience_required")?;
    if experience > f64::from(i32::MAX) {
        return Err(AppError::Validation("experience_required is too large".to_string()));
    }
    let salary_min = number(&req.salary_min, "salary_min")?;
    let salary_max = number(&req.salary_max, "salary_max")?;
    if salary_max > 0.0 && salary_min > salary_max {
        return Err(AppError::Validation(
            "salary_min cannot be greater than salary_max".to_string(),
        ));
    }

    let now = Utc::now();
    Ok(JobPosting {
        id: Uuid::new_v4(),
        organization_id,
        title: title.unwrap_or_default(),
        trade: trade.unwrap_or_default(),
        description: description.unwrap_or_default(),
        required_skills: req.required_skills.map(SkillsInput::into_skills).unwrap_or_default(),
        experience_required: experience.trunc() as i32,
        location: location.unwrap_or_default(),
        salary_min,
        salary_max,
        status: JobStatus::Active,
        created_at: now,
        updated_at: now,
    })
}

pub async fn post_job(store: &dyn Store, organization_id: Uuid, req: NewJobRequest) -> Result<JobPosting, AppError> {
    let job = build_job(organization_id, req)?;
    store.insert_job(&job).await?;
    info!(job_id = %job.id, org_id = %organization_id, "Job posted");
    Ok(job)
}

/// The job, if `org_id` owns it.
pub async fn owned_job(store: &dyn Store, org_id: Uuid, job_id: Uuid) -> Result<JobPosting, AppError> {
    let job = store
        .get_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    if job.organization_id != org_id {
        return Err(AppError::Forbidden);
    }
    Ok(job)
}

pub async fn set_job_status(
    store: &dyn Store,
    org_id: Uuid,
    job_id: Uuid,
    raw_status: &str,
) -> Result<JobPosting, AppError> {
    let status = JobStatus::parse(&sanitize_input(raw_status))
        .ok_or_else(|| AppError::Validation("Invalid status".to_string()))?;
    let mut job = owned_job(store, org_id, job_id).await?;
    store.update_job_status(job.id, status).await?;
    job.status = status;
    job.updated_at = Utc::now();
    Ok(job)
}

/// Creates a pending application. A second application for the same pair is
/// a conflict and writes nothing.
pub async fn apply_to_job(store: &dyn Store, worker_id: Uuid, job_id: Uuid) -> Result<Application, AppError> {
    let job = store
        .get_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    if store.find_application(worker_id, job_id).await?.is_some() {
        return Err(AppError::Conflict("Already applied to this job".to_string()));
    }

    if job.status != JobStatus::Active {
        return Err(AppError::Validation(
            "This job is no longer accepting applications".to_string(),
        ));
    }

    let application = Application::new(worker_id, job_id);
    match store.insert_application(&application).await {
        Ok(()) => {
            info!(application_id = %application.id, %job_id, "Application submitted");
            Ok(application)
        }
        Err(e) if is_unique_violation(&e) => {
            Err(AppError::Conflict("Already applied to this job".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Changes an application's status on behalf of the organization that owns
/// its job. Any other caller is rejected before anything is written.
pub async fn update_application_status(
    store: &dyn Store,
    org_id: Uuid,
    application_id: Uuid,
    raw_status: &str,
) -> Result<Application, AppError> {
    let status = ApplicationStatus::parse(&sanitize_input(raw_status))
        .ok_or_else(|| AppError::Validation("Invalid status".to_string()))?;

    let mut application = store
        .get_application(application_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    let job = store.get_job(application.job_id).await?;
    if job.map(|j| j.organization_id) != Some(org_id) {
        return Err(AppError::Forbidden);
    }

    store.update_application_status(application.id, status).await?;
    application.status = status;
    application.updated_at = Utc::now();
    Ok(application)
}

#[derive(Debug, Serialize)]
pub struct Applicant {
    pub application: Application,
    pub worker: WorkerProfile,
}

pub async fn list_applicants(store: &dyn Store, org_id: Uuid, job_id: Uuid) -> Result<Vec<Applicant>, AppError> {
    let job = owned_job(store, org_id, job_id).await?;
    let mut applicants = Vec::new();
    for application in store.list_applications_for_job(job.id).await? {
        if let Some(worker) = store.get_worker(application.worker_id).await? {
            applicants.push(Applicant { application, worker });
        }
    }
    Ok(applicants)
}

/// Organization names for the given ids. Unknown ids are absent.
pub async fn organization_names(
    store: &dyn Store,
    org_ids: &[Uuid],
) -> Result<HashMap<Uuid, String>, AppError> {
    let mut names = HashMap::new();
    for &id in org_ids {
        if names.contains_key(&id) {
            continue;
        }
        if let Some(org) = store.get_organization(id).await? {
            names.insert(id, org.name);
        }
    }
    Ok(names)
}

#[derive(Debug, Serialize)]
pub struct WorkerApplicationView {
    pub application: Application,
    pub job: Option<JobPosting>,
    pub organization_name: Option<String>,
}

pub async fn worker_applications(store: &dyn Store, worker_id: Uuid) -> Result<Vec<WorkerApplicationView>, AppError> {
    let mut views = Vec::new();
    for application in store.list_applications_for_worker(worker_id).await? {
        let job = store.get_job(application.job_id).await?;
        let organization_name = match &job {
            Some(job) => store.get_organization(job.organization_id).await?.map(|o| o.name),
            None => None,
        };
        views.push(WorkerApplicationView {
            application,
            job,
            organization_name,
        });
    }
    Ok(views)
}

#[derive(Debug, Serialize)]
pub struct JobWithCount {
    pub job: JobPosting,
    pub application_count: usize,
}

pub async fn jobs_with_counts(store: &dyn Store, org_id: Uuid) -> Result<Vec<JobWithCount>, AppError> {
    let mut jobs = Vec::new();
    for job in store.list_jobs_for_organization(org_id).await? {
        let application_count = store.list_applications_for_job(job.id).await?.len();
        jobs.push(JobWithCount { job, application_count });
    }
    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::language::Language;
    use crate::models::organization::OrganizationProfile;
    use serde_json::json;

    fn request(body: serde_json::Value) -> NewJobRequest {
        serde_json::from_value(body).unwrap()
    }

    fn valid_request() -> NewJobRequest {
        request(json!({
            "title": "Site Electrician",
            "trade": "Electrician",
            "description": "Wiring for new flats",
            "location": "Pune",
            "required_skills": "wiring, , panel repair ",
            "experience_required": "3",
            "salary_min": 18000,
            "salary_max": "25000"
        }))
    }

    async fn seeded() -> (MemoryStore, OrganizationProfile, WorkerProfile) {
        let store = MemoryStore::new();
        let org = OrganizationProfile::new("9000000001", "Sharma Builders");
        store.insert_organization(&org).await.unwrap();
        let worker = WorkerProfile::new("9123456780", Language::English);
        store.insert_worker(&worker).await.unwrap();
        (store, org, worker)
    }

    #[test]
    fn test_build_job_parses_skills_and_numbers() {
        let job = build_job(Uuid::new_v4(), valid_request()).unwrap();
        assert_eq!(job.required_skills, vec!["wiring", "panel repair"]);
        assert_eq!(job.experience_required, 3);
        assert_eq!(job.salary_max, 25000.0);
        assert_eq!(job.status, JobStatus::Active);
    }

    #[tokio::test]
    async fn test_empty_title_is_rejected_before_insert() {
        let (store, org, _) = seeded().await;
        let mut req = valid_request();
        req.title = Some(String::new());

        let result = post_job(&store, org.id, req).await;

        match result {
            Err(AppError::MissingFields(fields)) => assert_eq!(fields, vec!["title"]),
            other => panic!("expected missing title, got {other:?}"),
        }
        assert_eq!(store.job_count(), 0);
    }

    #[test]
    fn test_salary_and_experience_rules() {
        let org = Uuid::new_v4();

        let mut req = valid_request();
        req.salary_min = Some(NumberInput::Number(30000.0));
        assert!(matches!(build_job(org, req), Err(AppError::Validation(_))));

        let mut req = valid_request();
        req.experience_required = Some(NumberInput::Number(-1.0));
        assert!(matches!(build_job(org, req), Err(AppError::Validation(_))));

        let mut req = valid_request();
        req.salary_min = Some(NumberInput::Number(30000.0));
        req.salary_max = None;
        assert!(build_job(org, req).is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_application_conflicts_without_new_row() {
        let (store, org, worker) = seeded().await;
        let job = post_job(&store, org.id, valid_request()).await.unwrap();

        let first = apply_to_job(&store, worker.id, job.id).await.unwrap();
        assert_eq!(first.status, ApplicationStatus::Pending);

        let second = apply_to_job(&store, worker.id, job.id).await;
        assert!(matches!(second, Err(AppError::Conflict(_))));
        assert_eq!(store.application_count(), 1);
    }

    #[tokio::test]
    async fn test_closed_job_rejects_applications() {
        let (store, org, worker) = seeded().await;
        let job = post_job(&store, org.id, valid_request()).await.unwrap();
        set_job_status(&store, org.id, job.id, "closed").await.unwrap();

        let result = apply_to_job(&store, worker.id, job.id).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(store.list_active_jobs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reapplying_after_close_is_conflict() {
        let (store, org, worker) = seeded().await;
        let job = post_job(&store, org.id, valid_request()).await.unwrap();
        apply_to_job(&store, worker.id, job.id).await.unwrap();
        set_job_status(&store, org.id, job.id, "closed").await.unwrap();

        let again = apply_to_job(&store, worker.id, job.id).await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
        assert_eq!(store.application_count(), 1);
    }

    #[tokio::test]
    async fn test_only_owner_changes_application_status() {
        let (store, org, worker) = seeded().await;
        let rival = OrganizationProfile::new("9000000002", "Rival Works");
        store.insert_organization(&rival).await.unwrap();

        let job = post_job(&store, org.id, valid_request()).await.unwrap();
        let application = apply_to_job(&store, worker.id, job.id).await.unwrap();

        let denied = update_application_status(&store, rival.id, application.id, "approved").await;
        assert!(matches!(denied, Err(AppError::Forbidden)));
        let stored = store.get_application(application.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ApplicationStatus::Pending);

        let approved = update_application_status(&store, org.id, application.id, "approved")
            .await
            .unwrap();
        assert_eq!(approved.status, ApplicationStatus::Approved);
        let stored = store.get_application(application.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ApplicationStatus::Approved);
    }

    #[tokio::test]
    async fn test_invalid_status_value_is_validation_error() {
        let (store, org, worker) = seeded().await;
        let job = post_job(&store, org.id, valid_request()).await.unwrap();
        let application = apply_to_job(&store, worker.id, job.id).await.unwrap();

        let result = update_application_status(&store, org.id, application.id, "hired").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_dashboard_views_join_jobs_and_counts() {
        let (store, org, worker) = seeded().await;
        let job = post_job(&store, org.id, valid_request()).await.unwrap();
        post_job(&store, org.id, valid_request()).await.unwrap();
        apply_to_job(&store, worker.id, job.id).await.unwrap();

        let views = worker_applications(&store, worker.id).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].organization_name.as_deref(), Some("Sharma Builders"));

        let counts = jobs_with_counts(&store, org.id).await.unwrap();
        let total: usize = counts.iter().map(|c| c.application_count).sum();
        assert_eq!(counts.len(), 2);
        assert_eq!(total, 1);

        let applicants = list_applicants(&store, org.id, job.id).await.unwrap();
        assert_eq!(applicants[0].worker.id, worker.id);
    }
}
