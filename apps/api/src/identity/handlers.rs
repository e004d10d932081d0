//! Axum route handlers for session start, logout and account edits.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::db::{OrganizationExt, WorkerExt};
use crate::errors::AppError;
use crate::identity::{
    current_organization, current_worker, start_employer_session, start_worker_session,
    OrganizationAccountUpdate, WorkerAccountUpdate,
};
use crate::intake::state::IntakeState;
use crate::models::organization::OrganizationProfile;
use crate::models::worker::WorkerProfile;
use crate::session::{EmployerSession, Session, WorkerSession};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WorkerStartRequest {
    #[serde(default)]
    pub phone: String,
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WorkerStartResponse {
    pub success: bool,
    pub worker_id: Uuid,
    pub language: &'static str,
    pub state: IntakeState,
}

#[derive(Debug, Deserialize)]
pub struct EmployerStartRequest {
    #[serde(default)]
    pub phone: String,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmployerStartResponse {
    pub success: bool,
    pub org_id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct WorkerAccountResponse {
    pub worker: WorkerProfile,
    pub state: IntakeState,
}

/// POST /api/v1/worker/start
pub async fn handle_worker_start(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Json(req): Json<WorkerStartRequest>,
) -> Result<(SignedCookieJar, Json<WorkerStartResponse>), AppError> {
    let worker = start_worker_session(state.store.as_ref(), &req.phone, req.language.as_deref()).await?;

    let jar = Session::Worker { worker_id: worker.id }.store(jar);
    Ok((
        jar,
        Json(WorkerStartResponse {
            success: true,
            worker_id: worker.id,
            language: worker.language.code(),
            state: IntakeState::of(Some(&worker)),
        }),
    ))
}

/// POST /api/v1/employer/start
pub async fn handle_employer_start(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Json(req): Json<EmployerStartRequest>,
) -> Result<(SignedCookieJar, Json<EmployerStartResponse>), AppError> {
    let org = start_employer_session(state.store.as_ref(), &req.phone, req.name.as_deref()).await?;

    let jar = Session::Employer { org_id: org.id }.store(jar);
    Ok((
        jar,
        Json(EmployerStartResponse {
            success: true,
            org_id: org.id,
            name: org.name,
        }),
    ))
}

/// POST /api/v1/logout
pub async fn handle_logout(jar: SignedCookieJar) -> (SignedCookieJar, Json<Value>) {
    (Session::clear(jar), Json(json!({ "success": true })))
}

/// GET /api/v1/worker/account
pub async fn handle_worker_account(
    State(state): State<AppState>,
    session: WorkerSession,
) -> Result<Json<WorkerAccountResponse>, AppError> {
    let worker = current_worker(state.store.as_ref(), session.worker_id).await?;
    let intake = IntakeState::of(Some(&worker));
    Ok(Json(WorkerAccountResponse { worker, state: intake }))
}

/// POST /api/v1/worker/account
///
/// Only non-blank `name`, `location` and `trade` are written.
pub async fn handle_worker_account_update(
    State(state): State<AppState>,
    session: WorkerSession,
    Json(update): Json<WorkerAccountUpdate>,
) -> Result<Json<Value>, AppError> {
    let mut worker = current_worker(state.store.as_ref(), session.worker_id).await?;
    update.apply_to(&mut worker);
    state.store.save_worker(&worker).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully"
    })))
}

/// GET /api/v1/employer/account
pub async fn handle_employer_account(
    State(state): State<AppState>,
    session: EmployerSession,
) -> Result<Json<OrganizationProfile>, AppError> {
    let org = current_organization(state.store.as_ref(), session.org_id).await?;
    Ok(Json(org))
}

/// POST /api/v1/employer/account
pub async fn handle_employer_account_update(
    State(state): State<AppState>,
    session: EmployerSession,
    Json(update): Json<OrganizationAccountUpdate>,
) -> Result<Json<Value>, AppError> {
    let mut org = current_organization(state.store.as_ref(), session.org_id).await?;
    update.apply_to(&mut org);
    state.store.save_organization(&org).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully"
    })))
}
