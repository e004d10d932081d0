//! Axum route handlers for postings, applications and both dashboards.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::{current_organization, current_worker};
use crate::intake::state::IntakeState;
use crate::jobs::{
    apply_to_job, jobs_with_counts, list_applicants, owned_job, post_job, set_job_status,
    update_application_status, worker_applications, Applicant, JobWithCount, NewJobRequest,
    WorkerApplicationView,
};
use crate::models::application::Application;
use crate::models::job::JobPosting;
use crate::models::organization::OrganizationProfile;
use crate::models::worker::WorkerProfile;
use crate::session::{EmployerSession, WorkerSession};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct WorkerDashboardResponse {
    pub worker: WorkerProfile,
    pub state: IntakeState,
    pub applications: Vec<WorkerApplicationView>,
}

#[derive(Debug, Serialize)]
pub struct EmployerDashboardResponse {
    pub organization: OrganizationProfile,
    pub jobs: Vec<JobWithCount>,
}

#[derive(Debug, Serialize)]
pub struct ApplicantsResponse {
    pub job: JobPosting,
    pub applicants: Vec<Applicant>,
}

/// GET /api/v1/worker/dashboard
pub async fn handle_worker_dashboard(
    State(state): State<AppState>,
    session: WorkerSession,
) -> Result<Json<WorkerDashboardResponse>, AppError> {
    let worker = current_worker(state.store.as_ref(), session.worker_id).await?;
    let applications = worker_applications(state.store.as_ref(), worker.id).await?;
    let intake = IntakeState::of(Some(&worker));

    Ok(Json(WorkerDashboardResponse {
        worker,
        state: intake,
        applications,
    }))
}

/// POST /api/v1/worker/jobs/:job_id/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    session: WorkerSession,
    Path(job_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    current_worker(state.store.as_ref(), session.worker_id).await?;
    let application = apply_to_job(state.store.as_ref(), session.worker_id, job_id).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/employer/dashboard
pub async fn handle_employer_dashboard(
    State(state): State<AppState>,
    session: EmployerSession,
) -> Result<Json<EmployerDashboardResponse>, AppError> {
    let organization = current_organization(state.store.as_ref(), session.org_id).await?;
    let jobs = jobs_with_counts(state.store.as_ref(), organization.id).await?;
    Ok(Json(EmployerDashboardResponse { organization, jobs }))
}

/// POST /api/v1/employer/jobs
///
/// Rejects missing `title`, `trade`, `description` or `location` with a
/// field list before anything is stored.
pub async fn handle_post_job(
    State(state): State<AppState>,
    session: EmployerSession,
    Json(req): Json<NewJobRequest>,
) -> Result<(StatusCode, Json<JobPosting>), AppError> {
    current_organization(state.store.as_ref(), session.org_id).await?;
    let job = post_job(state.store.as_ref(), session.org_id, req).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// POST /api/v1/employer/jobs/:job_id/status
pub async fn handle_job_status(
    State(state): State<AppState>,
    session: EmployerSession,
    Path(job_id): Path<Uuid>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<JobPosting>, AppError> {
    let job = set_job_status(state.store.as_ref(), session.org_id, job_id, &req.status).await?;
    Ok(Json(job))
}

/// GET /api/v1/employer/jobs/:job_id/applicants
pub async fn handle_applicants(
    State(state): State<AppState>,
    session: EmployerSession,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ApplicantsResponse>, AppError> {
    let job = owned_job(state.store.as_ref(), session.org_id, job_id).await?;
    let applicants = list_applicants(state.store.as_ref(), session.org_id, job.id).await?;
    Ok(Json(ApplicantsResponse { job, applicants }))
}

/// POST /api/v1/employer/applications/:application_id/status
pub async fn handle_application_status(
    State(state): State<AppState>,
    session: EmployerSession,
    Path(application_id): Path<Uuid>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<Value>, AppError> {
    let application =
        update_application_status(state.store.as_ref(), session.org_id, application_id, &req.status).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Application status updated",
        "application": application
    })))
}
