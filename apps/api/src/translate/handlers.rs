use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::language::Language;
use crate::state::AppState;
use crate::translate::translate;

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: String,
    pub target_language: String,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub translated_text: String,
    pub target_language: Language,
}

/// POST /api/v1/translate
pub async fn handle_translate(
    State(state): State<AppState>,
    Json(req): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, AppError> {
    let target = Language::from_code(&req.target_language)
        .ok_or_else(|| AppError::Validation(format!("Unsupported language: {}", req.target_language.trim())))?;

    let translated_text = translate(state.llm.as_ref(), &req.text, target).await;
    Ok(Json(TranslateResponse {
        translated_text,
        target_language: target,
    }))
}
