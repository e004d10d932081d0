//! Axum route handlers for the intake conversation.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::db::WorkerExt;
use crate::errors::AppError;
use crate::identity::current_worker;
use crate::intake::assistant::run_turn;
use crate::intake::state::IntakeState;
use crate::models::language::Language;
use crate::models::worker::ChatTurn;
use crate::session::WorkerSession;
use crate::state::AppState;
use crate::validation::sanitize_input;

#[derive(Debug, Serialize)]
pub struct ChatViewResponse {
    pub language: Language,
    pub state: IntakeState,
    pub resume_complete: bool,
    pub transcript: Vec<ChatTurn>,
}

#[derive(Debug, Deserialize)]
pub struct ChatMessageRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatMessageResponse {
    pub response: String,
    /// This turn carried the completion signal.
    pub is_complete: bool,
    /// Sticky profile flag after the turn.
    pub resume_complete: bool,
    pub state: IntakeState,
}

/// GET /api/v1/worker/chat
pub async fn handle_chat_view(
    State(state): State<AppState>,
    session: WorkerSession,
) -> Result<Json<ChatViewResponse>, AppError> {
    let worker = current_worker(state.store.as_ref(), session.worker_id).await?;
    let intake = IntakeState::of(Some(&worker));

    Ok(Json(ChatViewResponse {
        language: worker.language,
        state: intake,
        resume_complete: worker.resume_complete(),
        transcript: worker.transcript,
    }))
}

/// POST /api/v1/worker/chat/message
///
/// Runs one intake turn. Collaborator failures surface as reply text, so this
/// only errors on bad input, a stale session or storage failure.
pub async fn handle_chat_message(
    State(state): State<AppState>,
    session: WorkerSession,
    Json(req): Json<ChatMessageRequest>,
) -> Result<Json<ChatMessageResponse>, AppError> {
    let message = sanitize_input(&req.message);
    if message.is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let mut worker = current_worker(state.store.as_ref(), session.worker_id).await?;
    let outcome = run_turn(state.llm.as_ref(), &mut worker, &message).await;
    state.store.save_worker(&worker).await?;

    Ok(Json(ChatMessageResponse {
        response: outcome.reply,
        is_complete: outcome.is_complete,
        resume_complete: worker.resume_complete(),
        state: IntakeState::of(Some(&worker)),
    }))
}
