//! One intake chat turn: the conversational call, the completion signal and
//! the extraction step that runs once the collaborator says it is done.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::intake::extraction::ProfileExtraction;
use crate::intake::prompts::{extraction_prompt, intake_system, COMPLETION_MARKER};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{generate_json, GenerationRequest, LanguageModel, LlmError, Message, ModelTier, Role};
use crate::models::language::Language;
use crate::models::worker::{ChatTurn, Speaker, WorkerProfile};

/// Reply used when the model answers with nothing at all.
pub const EMPTY_REPLY_FALLBACK: &str = "I'm here to help you build your resume.";

const CHAT_TEMPERATURE: f32 = 0.7;

/// Whether a conversational reply says information gathering is finished.
pub fn is_completion_signal(reply: &str) -> bool {
    reply.contains(COMPLETION_MARKER)
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub reply: String,
    /// True when this turn's reply carried the completion signal.
    pub is_complete: bool,
}

fn as_history(transcript: &[ChatTurn]) -> Vec<Message> {
    transcript
        .iter()
        .map(|turn| Message {
            role: match turn.role {
                Speaker::Worker => Role::User,
                Speaker::Assistant => Role::Model,
            },
            text: turn.content.clone(),
        })
        .collect()
}

/// Asks the conversational collaborator for the next reply.
pub async fn converse(
    llm: &dyn LanguageModel,
    language: Language,
    history: &[ChatTurn],
    utterance: &str,
) -> Result<String, LlmError> {
    let request = GenerationRequest::conversation(ModelTier::Fast, as_history(history), utterance)
        .with_system(intake_system(language))
        .with_temperature(CHAT_TEMPERATURE);
    llm.generate(request).await
}

/// Structured extraction over the whole transcript. `None` on any failure.
pub async fn extract_profile(llm: &dyn LanguageModel, transcript: &[ChatTurn]) -> Option<ProfileExtraction> {
    let transcript_json = match serde_json::to_string_pretty(transcript) {
        Ok(json) => json,
        Err(e) => {
            warn!("Could not serialize transcript for extraction: {e}");
            return None;
        }
    };

    let request = GenerationRequest::prompt(ModelTier::Pro, extraction_prompt(&transcript_json))
        .with_system(JSON_ONLY_SYSTEM);

    match generate_json::<Value>(llm, request).await {
        Ok(value) => {
            let extraction = ProfileExtraction::from_value(&value);
            if extraction.is_none() {
                warn!("Extraction returned a non-object JSON value, ignoring it");
            }
            extraction
        }
        Err(e) => {
            warn!("Profile extraction failed: {e}");
            None
        }
    }
}

/// Runs one chat turn against `profile`, mutating it in place. The caller
/// persists the profile afterwards.
///
/// The worker utterance is appended before the reply, and both are appended
/// before extraction starts. Collaborator failures become the reply text.
pub async fn run_turn(llm: &dyn LanguageModel, profile: &mut WorkerProfile, utterance: &str) -> TurnOutcome {
    let history = profile.transcript.clone();
    profile.transcript.push(ChatTurn::worker(utterance));

    let (reply, is_complete) = match converse(llm, profile.language, &history, utterance).await {
        Ok(reply) => {
            let done = is_completion_signal(&reply);
            (reply, done)
        }
        Err(LlmError::EmptyContent) => (EMPTY_REPLY_FALLBACK.to_string(), false),
        Err(e) => {
            warn!(worker_id = %profile.id, "Intake chat call failed: {e}");
            (format!("Error: {e}"), false)
        }
    };

    profile.transcript.push(ChatTurn::assistant(reply.clone()));

    if is_complete {
        match extract_profile(llm, &profile.transcript).await {
            Some(extraction) => extraction.apply_to(profile),
            None => info!(worker_id = %profile.id, "Marking intake complete without extracted fields"),
        }
        profile.mark_resume_complete();
    }

    profile.updated_at = Utc::now();
    TurnOutcome { reply, is_complete }
}
