//! ATS resume copy. Display-only text; nothing parses it back.

use tracing::warn;

use crate::llm_client::{GenerationRequest, LanguageModel, ModelTier};
use crate::resume::document::ResumeDocument;
use crate::resume::prompts::resume_copy_prompt;

pub const RESUME_COPY_FALLBACK: &str = "Resume generation failed";

const RESUME_COPY_TEMPERATURE: f32 = 0.3;

pub async fn ats_resume_copy(llm: &dyn LanguageModel, document: &ResumeDocument) -> String {
    let worker_json = match serde_json::to_string_pretty(document) {
        Ok(json) => json,
        Err(e) => {
            warn!("Could not serialize resume document: {e}");
            return RESUME_COPY_FALLBACK.to_string();
        }
    };

    let request = GenerationRequest::prompt(ModelTier::Pro, resume_copy_prompt(&worker_json))
        .with_temperature(RESUME_COPY_TEMPERATURE);

    match llm.generate(request).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Resume copy generation failed: {e}");
            RESUME_COPY_FALLBACK.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedModel;
    use crate::models::language::Language;
    use crate::models::worker::WorkerProfile;
    use crate::resume::skills::CategorizedSkills;

    fn document() -> ResumeDocument {
        let mut worker = WorkerProfile::new("9123456780", Language::English);
        worker.name = Some("Meena".to_string());
        worker.skills = vec!["tiling".to_string()];
        worker.transcript.push(crate::models::worker::ChatTurn::worker("private chat line"));
        ResumeDocument::new(&worker, CategorizedSkills::fallback(&worker.skills))
    }

    #[tokio::test]
    async fn test_copy_request_sends_document_as_json() {
        let model = ScriptedModel::new(vec![Ok("MEENA\nSUMMARY\n...".to_string())]);
        let text = ats_resume_copy(&model, &document()).await;

        assert_eq!(text, "MEENA\nSUMMARY\n...");
        let request = &model.requests()[0];
        assert_eq!(request.tier, ModelTier::Pro);
        assert_eq!(request.temperature, Some(RESUME_COPY_TEMPERATURE));
        assert!(!request.json_output);
        assert!(request.last_text().contains("\"categorized_skills\""));
        assert!(!request.last_text().contains("private chat line"));
    }

    #[tokio::test]
    async fn test_failure_returns_fallback_text() {
        let text = ats_resume_copy(&ScriptedModel::failing(), &document()).await;
        assert_eq!(text, RESUME_COPY_FALLBACK);
    }
}
