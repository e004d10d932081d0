//! Skill Normalization: sorts a worker's free-text skills into three fixed
//! categories. The collaborator does the work; the fallback is deterministic.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{generate_json, GenerationRequest, LanguageModel, ModelTier};
use crate::resume::prompts::skill_categorization_prompt;

/// All three keys are required; a reply missing any of them is a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedSkills {
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub tools_equipment: Vec<String>,
}

impl CategorizedSkills {
    /// Raw skills as technical, nothing else.
    pub fn fallback(raw_skills: &[String]) -> Self {
        Self {
            technical_skills: raw_skills.to_vec(),
            soft_skills: Vec::new(),
            tools_equipment: Vec::new(),
        }
    }
}

pub async fn normalize_skills(llm: &dyn LanguageModel, raw_skills: &[String], trade: &str) -> CategorizedSkills {
    let request = GenerationRequest::prompt(ModelTier::Fast, skill_categorization_prompt(trade, raw_skills))
        .with_system(JSON_ONLY_SYSTEM);

    match generate_json::<CategorizedSkills>(llm, request).await {
        Ok(skills) => skills,
        Err(e) => {
            warn!("Skill categorization failed, using raw skills: {e}");
            CategorizedSkills::fallback(raw_skills)
        }
    }
}
