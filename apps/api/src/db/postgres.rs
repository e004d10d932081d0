use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{ApplicationExt, JobExt, OrganizationExt, WorkerExt};
use crate::models::application::{Application, ApplicationRow, ApplicationStatus};
use crate::models::job::{JobPosting, JobRow, JobStatus};
use crate::models::language::Language;
use crate::models::organization::OrganizationProfile;
use crate::models::worker::{WorkerProfile, WorkerRow};

/// PostgreSQL-backed store. Each query checks a connection out of the pool
/// for its own duration and returns it when the future completes or drops.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkerExt for PgStore {
    async fn get_worker(&self, id: Uuid) -> Result<Option<WorkerProfile>, sqlx::Error> {
        let row = sqlx::query_as::<_, WorkerRow>("SELECT * FROM workers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(WorkerProfile::from))
    }

    async fn get_worker_by_phone(&self, phone: &str) -> Result<Option<WorkerProfile>, sqlx::Error> {
        let row = sqlx::query_as::<_, WorkerRow>("SELECT * FROM workers WHERE phone = $1")
            .bind(phone)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(WorkerProfile::from))
    }

    async fn insert_worker(&self, worker: &WorkerProfile) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO workers (id, phone, language, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(worker.id)
        .bind(&worker.phone)
        .bind(worker.language.code())
        .bind(worker.created_at)
        .bind(worker.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_worker_language(&self, id: Uuid, language: Language) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE workers SET language = $1, updated_at = NOW() WHERE id = $2")
            .bind(language.code())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn save_worker(&self, worker: &WorkerProfile) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE workers SET
                name = $1, trade = $2, experience_years = $3, location = $4,
                language = $5, skills = $6, education = $7, certifications = $8,
                work_history = $9, chat_history = $10,
                resume_complete = resume_complete OR $11,
                updated_at = NOW()
            WHERE id = $12
            "#,
        )
        .bind(&worker.name)
        .bind(&worker.trade)
        .bind(worker.experience_years)
        .bind(&worker.location)
        .bind(worker.language.code())
        .bind(json!(worker.skills))
        .bind(&worker.education)
        .bind(&worker.certifications)
        .bind(json!(worker.work_history))
        .bind(json!(worker.transcript))
        .bind(worker.resume_complete())
        .bind(worker.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_complete_workers(&self) -> Result<Vec<WorkerProfile>, sqlx::Error> {
        let rows = sqlx::query_as::<_, WorkerRow>(
            "SELECT * FROM workers WHERE resume_complete ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(WorkerProfile::from).collect())
    }
}

#[async_trait]
impl OrganizationExt for PgStore {
    async fn get_organization(&self, id: Uuid) -> Result<Option<OrganizationProfile>, sqlx::Error> {
        sqlx::query_as::<_, OrganizationProfile>("SELECT * FROM organizations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_organization_by_phone(
        &self,
        phone: &str,
    ) -> Result<Option<OrganizationProfile>, sqlx::Error> {
        sqlx::query_as::<_, OrganizationProfile>("SELECT * FROM organizations WHERE phone = $1")
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert_organization(&self, org: &OrganizationProfile) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO organizations
                (id, phone, name, email, location, industry, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(org.id)
        .bind(&org.phone)
        .bind(&org.name)
        .bind(&org.email)
        .bind(&org.location)
        .bind(&org.industry)
        .bind(&org.description)
        .bind(org.created_at)
        .bind(org.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save_organization(&self, org: &OrganizationProfile) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE organizations SET
                name = $1, email = $2, location = $3, industry = $4, description = $5,
                updated_at = NOW()
            WHERE id = $6
            "#,
        )
        .bind(&org.name)
        .bind(&org.email)
        .bind(&org.location)
        .bind(&org.industry)
        .bind(&org.description)
        .bind(org.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl JobExt for PgStore {
    async fn get_job(&self, id: Uuid) -> Result<Option<JobPosting>, sqlx::Error> {
        let row = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(JobPosting::from))
    }

    async fn insert_job(&self, job: &JobPosting) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO jobs
                (id, organization_id, title, trade, description, required_skills,
                 experience_required, location, salary_min, salary_max, status,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(job.id)
        .bind(job.organization_id)
        .bind(&job.title)
        .bind(&job.trade)
        .bind(&job.description)
        .bind(json!(job.required_skills))
        .bind(job.experience_required)
        .bind(&job.location)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(job.status.as_str())
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_job_status(&self, id: Uuid, status: JobStatus) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE jobs SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_active_jobs(&self) -> Result<Vec<JobPosting>, sqlx::Error> {
        let rows = sqlx::query_as::<_, JobRow>(
            "SELECT * FROM jobs WHERE status = 'active' ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(JobPosting::from).collect())
    }

    async fn list_jobs_for_organization(&self, org_id: Uuid) -> Result<Vec<JobPosting>, sqlx::Error> {
        let rows = sqlx::query_as::<_, JobRow>(
            "SELECT * FROM jobs WHERE organization_id = $1 ORDER BY created_at DESC",
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(JobPosting::from).collect())
    }
}

#[async_trait]
impl ApplicationExt for PgStore {
    async fn get_application(&self, id: Uuid) -> Result<Option<Application>, sqlx::Error> {
        let row = sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Application::from))
    }

    async fn find_application(
        &self,
        worker_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>, sqlx::Error> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications WHERE worker_id = $1 AND job_id = $2",
        )
        .bind(worker_id)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Application::from))
    }

    async fn insert_application(&self, application: &Application) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO applications (id, worker_id, job_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(application.id)
        .bind(application.worker_id)
        .bind(application.job_id)
        .bind(application.status.as_str())
        .bind(application.created_at)
        .bind(application.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE applications SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_applications_for_worker(&self, worker_id: Uuid) -> Result<Vec<Application>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications WHERE worker_id = $1 ORDER BY created_at DESC",
        )
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Application::from).collect())
    }

    async fn list_applications_for_job(&self, job_id: Uuid) -> Result<Vec<Application>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications WHERE job_id = $1 ORDER BY created_at ASC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Application::from).collect())
    }
}
