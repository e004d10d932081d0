pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::identity::handlers as identity;
use crate::intake::handlers as intake;
use crate::jobs::handlers as jobs;
use crate::matching::handlers as matching;
use crate::resume::handlers as resume;
use crate::state::AppState;
use crate::translate::handlers as translate;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route("/api/v1/worker/start", post(identity::handle_worker_start))
        .route("/api/v1/employer/start", post(identity::handle_employer_start))
        .route("/api/v1/logout", post(identity::handle_logout))
        // Worker
        .route("/api/v1/worker/dashboard", get(jobs::handle_worker_dashboard))
        .route(
            "/api/v1/worker/account",
            get(identity::handle_worker_account).post(identity::handle_worker_account_update),
        )
        .route("/api/v1/worker/chat", get(intake::handle_chat_view))
        .route("/api/v1/worker/chat/message", post(intake::handle_chat_message))
        .route("/api/v1/worker/resume/preview", get(resume::handle_resume_preview))
        .route("/api/v1/worker/resume/download", get(resume::handle_resume_download))
        .route(
            "/api/v1/worker/jobs/recommended",
            get(matching::handle_recommended_jobs),
        )
        .route("/api/v1/worker/jobs/:job_id/apply", post(jobs::handle_apply))
        // Employer
        .route("/api/v1/employer/dashboard", get(jobs::handle_employer_dashboard))
        .route(
            "/api/v1/employer/account",
            get(identity::handle_employer_account).post(identity::handle_employer_account_update),
        )
        .route("/api/v1/employer/jobs", post(jobs::handle_post_job))
        .route(
            "/api/v1/employer/jobs/:job_id/status",
            post(jobs::handle_job_status),
        )
        .route(
            "/api/v1/employer/jobs/:job_id/applicants",
            get(jobs::handle_applicants),
        )
        .route(
            "/api/v1/employer/jobs/:job_id/matches",
            get(matching::handle_worker_matches),
        )
        .route(
            "/api/v1/employer/applications/:application_id/status",
            post(jobs::handle_application_status),
        )
        // Localisation
        .route("/api/v1/translate", post(translate::handle_translate))
        .with_state(state)
}
