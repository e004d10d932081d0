//! Axum route handlers for resume preview and download.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::identity::current_worker;
use crate::models::worker::WorkerProfile;
use crate::resume::copywriter::ats_resume_copy;
use crate::resume::document::ResumeDocument;
use crate::resume::skills::{normalize_skills, CategorizedSkills};
use crate::session::WorkerSession;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ResumePreviewResponse {
    pub document: ResumeDocument,
    pub categorized_skills: CategorizedSkills,
    pub resume_content: String,
}

async fn completed_worker(state: &AppState, session: WorkerSession) -> Result<WorkerProfile, AppError> {
    let worker = current_worker(state.store.as_ref(), session.worker_id).await?;
    if !worker.resume_complete() {
        return Err(AppError::UnprocessableEntity("Resume not ready".to_string()));
    }
    Ok(worker)
}

async fn build_document(state: &AppState, worker: &WorkerProfile) -> ResumeDocument {
    let trade = worker.trade.as_deref().unwrap_or_default();
    let categorized = normalize_skills(state.llm.as_ref(), &worker.skills, trade).await;
    ResumeDocument::new(worker, categorized)
}

/// GET /api/v1/worker/resume/preview
pub async fn handle_resume_preview(
    State(state): State<AppState>,
    session: WorkerSession,
) -> Result<Json<ResumePreviewResponse>, AppError> {
    let worker = completed_worker(&state, session).await?;
    let document = build_document(&state, &worker).await;
    let resume_content = ats_resume_copy(state.llm.as_ref(), &document).await;

    Ok(Json(ResumePreviewResponse {
        categorized_skills: document.categorized_skills.clone(),
        document,
        resume_content,
    }))
}

/// GET /api/v1/worker/resume/download
///
/// Markdown attachment named `<name>_Resume.md`.
pub async fn handle_resume_download(
    State(state): State<AppState>,
    session: WorkerSession,
) -> Result<Response, AppError> {
    let worker = completed_worker(&state, session).await?;
    let document = build_document(&state, &worker).await;

    let disposition = format!("attachment; filename=\"{}\"", document.file_name());
    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.to_markdown(),
    )
        .into_response())
}
