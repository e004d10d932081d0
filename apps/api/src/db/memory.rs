//! In-memory store used by tests. Mirrors the Postgres semantics that matter
//! to callers: unique phone keys, the (worker, job) application constraint,
//! sticky completion flag, insertion-ordered scans.

use std::borrow::Cow;
use std::sync::Mutex;

use async_trait::async_trait;
use sqlx::error::{DatabaseError, ErrorKind};
use uuid::Uuid;

use crate::db::{ApplicationExt, JobExt, OrganizationExt, WorkerExt};
use crate::models::application::{Application, ApplicationStatus};
use crate::models::job::{JobPosting, JobStatus};
use crate::models::language::Language;
use crate::models::organization::OrganizationProfile;
use crate::models::worker::WorkerProfile;

#[derive(Default)]
pub struct MemoryStore {
    workers: Mutex<Vec<WorkerProfile>>,
    organizations: Mutex<Vec<OrganizationProfile>>,
    jobs: Mutex<Vec<JobPosting>>,
    applications: Mutex<Vec<Application>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn application_count(&self) -> usize {
        self.applications.lock().unwrap().len()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }
}

/// Stand-in for the Postgres `23505` error, so callers see the same
/// `sqlx::Error::Database` shape they get in production.
#[derive(Debug, thiserror::Error)]
#[error("duplicate key value violates unique constraint")]
struct UniqueViolation;

impl DatabaseError for UniqueViolation {
    fn message(&self) -> &str {
        "duplicate key value violates unique constraint"
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed("23505"))
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::UniqueViolation
    }
}

fn unique_violation() -> sqlx::Error {
    sqlx::Error::Database(Box::new(UniqueViolation))
}

#[async_trait]
impl WorkerExt for MemoryStore {
    async fn get_worker(&self, id: Uuid) -> Result<Option<WorkerProfile>, sqlx::Error> {
        Ok(self.workers.lock().unwrap().iter().find(|w| w.id == id).cloned())
    }

    async fn get_worker_by_phone(&self, phone: &str) -> Result<Option<WorkerProfile>, sqlx::Error> {
        Ok(self
            .workers
            .lock()
            .unwrap()
            .iter()
            .find(|w| w.phone == phone)
            .cloned())
    }

    async fn insert_worker(&self, worker: &WorkerProfile) -> Result<(), sqlx::Error> {
        let mut workers = self.workers.lock().unwrap();
        if workers.iter().any(|w| w.phone == worker.phone) {
            return Err(unique_violation());
        }
        workers.push(worker.clone());
        Ok(())
    }

    async fn update_worker_language(&self, id: Uuid, language: Language) -> Result<(), sqlx::Error> {
        if let Some(w) = self.workers.lock().unwrap().iter_mut().find(|w| w.id == id) {
            w.language = language;
        }
        Ok(())
    }

    async fn save_worker(&self, worker: &WorkerProfile) -> Result<(), sqlx::Error> {
        if let Some(stored) = self.workers.lock().unwrap().iter_mut().find(|w| w.id == worker.id) {
            let was_complete = stored.resume_complete();
            *stored = worker.clone();
            if was_complete {
                stored.mark_resume_complete();
            }
        }
        Ok(())
    }

    async fn list_complete_workers(&self) -> Result<Vec<WorkerProfile>, sqlx::Error> {
        Ok(self
            .workers
            .lock()
            .unwrap()
            .iter()
            .filter(|w| w.resume_complete())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl OrganizationExt for MemoryStore {
    async fn get_organization(&self, id: Uuid) -> Result<Option<OrganizationProfile>, sqlx::Error> {
        Ok(self
            .organizations
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }

    async fn get_organization_by_phone(
        &self,
        phone: &str,
    ) -> Result<Option<OrganizationProfile>, sqlx::Error> {
        Ok(self
            .organizations
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.phone == phone)
            .cloned())
    }

    async fn insert_organization(&self, org: &OrganizationProfile) -> Result<(), sqlx::Error> {
        let mut orgs = self.organizations.lock().unwrap();
        if orgs.iter().any(|o| o.phone == org.phone) {
            return Err(unique_violation());
        }
        orgs.push(org.clone());
        Ok(())
    }

    async fn save_organization(&self, org: &OrganizationProfile) -> Result<(), sqlx::Error> {
        if let Some(stored) = self
            .organizations
            .lock()
            .unwrap()
            .iter_mut()
            .find(|o| o.id == org.id)
        {
            *stored = org.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl JobExt for MemoryStore {
    async fn get_job(&self, id: Uuid) -> Result<Option<JobPosting>, sqlx::Error> {
        Ok(self.jobs.lock().unwrap().iter().find(|j| j.id == id).cloned())
    }

    async fn insert_job(&self, job: &JobPosting) -> Result<(), sqlx::Error> {
        self.jobs.lock().unwrap().push(job.clone());
        Ok(())
    }

    async fn update_job_status(&self, id: Uuid, status: JobStatus) -> Result<(), sqlx::Error> {
        if let Some(job) = self.jobs.lock().unwrap().iter_mut().find(|j| j.id == id) {
            job.status = status;
        }
        Ok(())
    }

    async fn list_active_jobs(&self) -> Result<Vec<JobPosting>, sqlx::Error> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| j.status == JobStatus::Active)
            .cloned()
            .collect())
    }

    async fn list_jobs_for_organization(&self, org_id: Uuid) -> Result<Vec<JobPosting>, sqlx::Error> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| j.organization_id == org_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ApplicationExt for MemoryStore {
    async fn get_application(&self, id: Uuid) -> Result<Option<Application>, sqlx::Error> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn find_application(
        &self,
        worker_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>, sqlx::Error> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.worker_id == worker_id && a.job_id == job_id)
            .cloned())
    }

    async fn insert_application(&self, application: &Application) -> Result<(), sqlx::Error> {
        let mut apps = self.applications.lock().unwrap();
        if apps
            .iter()
            .any(|a| a.worker_id == application.worker_id && a.job_id == application.job_id)
        {
            return Err(unique_violation());
        }
        apps.push(application.clone());
        Ok(())
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<(), sqlx::Error> {
        if let Some(app) = self.applications.lock().unwrap().iter_mut().find(|a| a.id == id) {
            app.status = status;
        }
        Ok(())
    }

    async fn list_applications_for_worker(&self, worker_id: Uuid) -> Result<Vec<Application>, sqlx::Error> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.worker_id == worker_id)
            .cloned()
            .collect())
    }

    async fn list_applications_for_job(&self, job_id: Uuid) -> Result<Vec<Application>, sqlx::Error> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect())
    }
}
