//! Best-effort UI localisation through the translation collaborator.

pub mod handlers;

use tracing::warn;

use crate::llm_client::{GenerationRequest, LanguageModel, LlmError, ModelTier};
use crate::models::language::Language;

fn translation_prompt(text: &str, target: Language) -> String {
    format!(
        "Translate the following text to {}. Return only the translation:\n\n{text}",
        target.display_name()
    )
}

/// Translates `text` into `target`. English is returned as-is without a call,
/// and any failure returns the source text.
pub async fn translate(llm: &dyn LanguageModel, text: &str, target: Language) -> String {
    if target == Language::English || text.trim().is_empty() {
        return text.to_string();
    }

    let request = GenerationRequest::prompt(ModelTier::Fast, translation_prompt(text, target));
    match llm.generate(request).await {
        Ok(translated) => translated.trim().to_string(),
        Err(LlmError::EmptyContent) => text.to_string(),
        Err(e) => {
            warn!(target_language = target.code(), "Translation failed: {e}");
            text.to_string()
        }
    }
}
