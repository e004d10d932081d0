//! Storage boundary. Handlers and services only see the `Store` traits;
//! `PgStore` is the production backend.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::application::{Application, ApplicationStatus};
use crate::models::job::{JobPosting, JobStatus};
use crate::models::language::Language;
use crate::models::organization::OrganizationProfile;
use crate::models::worker::WorkerProfile;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

/// Creates a PostgreSQL connection pool and applies pending migrations.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("PostgreSQL connection pool established, migrations applied");
    Ok(pool)
}

#[async_trait]
pub trait WorkerExt {
    async fn get_worker(&self, id: Uuid) -> Result<Option<WorkerProfile>, sqlx::Error>;

    async fn get_worker_by_phone(&self, phone: &str) -> Result<Option<WorkerProfile>, sqlx::Error>;

    async fn insert_worker(&self, worker: &WorkerProfile) -> Result<(), sqlx::Error>;

    async fn update_worker_language(&self, id: Uuid, language: Language) -> Result<(), sqlx::Error>;

    /// Writes every mutable field. The stored completion flag is never lowered.
    async fn save_worker(&self, worker: &WorkerProfile) -> Result<(), sqlx::Error>;

    async fn list_complete_workers(&self) -> Result<Vec<WorkerProfile>, sqlx::Error>;
}

#[async_trait]
pub trait OrganizationExt {
    async fn get_organization(&self, id: Uuid) -> Result<Option<OrganizationProfile>, sqlx::Error>;

    async fn get_organization_by_phone(
        &self,
        phone: &str,
    ) -> Result<Option<OrganizationProfile>, sqlx::Error>;

    async fn insert_organization(&self, org: &OrganizationProfile) -> Result<(), sqlx::Error>;

    async fn save_organization(&self, org: &OrganizationProfile) -> Result<(), sqlx::Error>;
}

#[async_trait]
pub trait JobExt {
    async fn get_job(&self, id: Uuid) -> Result<Option<JobPosting>, sqlx::Error>;

    async fn insert_job(&self, job: &JobPosting) -> Result<(), sqlx::Error>;

    async fn update_job_status(&self, id: Uuid, status: JobStatus) -> Result<(), sqlx::Error>;

    async fn list_active_jobs(&self) -> Result<Vec<JobPosting>, sqlx::Error>;

    async fn list_jobs_for_organization(&self, org_id: Uuid) -> Result<Vec<JobPosting>, sqlx::Error>;
}

#[async_trait]
pub trait ApplicationExt {
    async fn get_application(&self, id: Uuid) -> Result<Option<Application>, sqlx::Error>;

    async fn find_application(
        &self,
        worker_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>, sqlx::Error>;

    async fn insert_application(&self, application: &Application) -> Result<(), sqlx::Error>;

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<(), sqlx::Error>;

    async fn list_applications_for_worker(&self, worker_id: Uuid) -> Result<Vec<Application>, sqlx::Error>;

    async fn list_applications_for_job(&self, job_id: Uuid) -> Result<Vec<Application>, sqlx::Error>;
}

/// Everything the service needs from storage. Carried in `AppState` as `Arc<dyn Store>`.
pub trait Store: WorkerExt + OrganizationExt + JobExt + ApplicationExt + Send + Sync {}

impl<T> Store for T where T: WorkerExt + OrganizationExt + JobExt + ApplicationExt + Send + Sync {}

/// True when the error is a unique-constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}
