//! Axum route handlers for job recommendations and employer-side matches.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::db::{JobExt, WorkerExt};
use crate::errors::AppError;
use crate::identity::current_worker;
use crate::jobs::{organization_names, owned_job};
use crate::matching::orchestrator::{
    join_jobs, rank_workers_for_job, score, CandidateSummary, SubjectSummary, WorkerMatch,
};
use crate::models::job::JobPosting;
use crate::session::{EmployerSession, WorkerSession};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecommendedJob {
    #[serde(flatten)]
    pub job: JobPosting,
    pub organization_name: String,
    pub match_score: f64,
    pub match_reasoning: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendedJobsResponse {
    pub jobs: Vec<RecommendedJob>,
}

#[derive(Debug, Serialize)]
pub struct WorkerMatchesResponse {
    pub job: JobPosting,
    pub matches: Vec<WorkerMatch>,
}

/// GET /api/v1/worker/jobs/recommended
///
/// Scores every active job for the worker. An empty list is a normal answer,
/// including when the ranking collaborator is unavailable.
pub async fn handle_recommended_jobs(
    State(state): State<AppState>,
    session: WorkerSession,
) -> Result<Json<RecommendedJobsResponse>, AppError> {
    let worker = current_worker(state.store.as_ref(), session.worker_id).await?;
    if !worker.resume_complete() {
        return Err(AppError::UnprocessableEntity(
            "Finish the resume conversation before viewing job matches".to_string(),
        ));
    }

    let active = state.store.list_active_jobs().await?;
    let candidates: Vec<CandidateSummary> = active.iter().map(CandidateSummary::of_job).collect();
    let results = score(state.llm.as_ref(), &SubjectSummary::of_worker(&worker), &candidates).await;
    let joined = join_jobs(results, &active);

    let org_ids: Vec<Uuid> = joined.iter().map(|(job, _)| job.organization_id).collect();
    let names = organization_names(state.store.as_ref(), &org_ids).await?;

    let jobs = joined
        .into_iter()
        .map(|(job, result)| RecommendedJob {
            organization_name: names
                .get(&job.organization_id)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string()),
            job: job.clone(),
            match_score: result.score,
            match_reasoning: result.reasoning,
        })
        .collect();

    Ok(Json(RecommendedJobsResponse { jobs }))
}

/// GET /api/v1/employer/jobs/:job_id/matches
///
/// Ranks every intake-complete worker against one of the caller's jobs.
pub async fn handle_worker_matches(
    State(state): State<AppState>,
    session: EmployerSession,
    Path(job_id): Path<Uuid>,
) -> Result<Json<WorkerMatchesResponse>, AppError> {
    let job = owned_job(state.store.as_ref(), session.org_id, job_id).await?;
    let workers = state.store.list_complete_workers().await?;
    let matches = rank_workers_for_job(state.llm.as_ref(), &job, &workers).await;
    Ok(Json(WorkerMatchesResponse { job, matches }))
}
