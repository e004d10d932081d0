// Matching LLM prompt templates.
// The weighting is instruction text for the collaborator; nothing here computes it.

/// Job-scoring prompt template. Replace `{subject}` and `{jobs_json}` before sending.
pub const MATCHING_PROMPT_TEMPLATE: &str = r#"{subject}

Available Jobs:
{jobs_json}

Score each job for this worker on a scale of 1-10 based on:
- Skill overlap (40%)
- Experience match (30%)
- Location proximity (20%)
- Growth potential (10%)

Return JSON array sorted by score (highest first):
[
    {
        "job_id": "<job_id copied exactly from Available Jobs>",
        "score": 8.5,
        "reasoning": "Strong skill match, location nearby, slightly more experience than required"
    }
]

Return only top 10 matches."#;

pub fn matching_prompt(subject: &str, jobs_json: &str) -> String {
    MATCHING_PROMPT_TEMPLATE
        .replace("{subject}", subject)
        .replace("{jobs_json}", jobs_json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_are_sent_verbatim() {
        let prompt = matching_prompt("Worker Profile:", "[]");
        for line in [
            "- Skill overlap (40%)",
            "- Experience match (30%)",
            "- Location proximity (20%)",
            "- Growth potential (10%)",
            "Return only top 10 matches.",
        ] {
            assert!(prompt.contains(line), "missing {line}");
        }
        assert!(prompt.starts_with("Worker Profile:"));
    }
}
