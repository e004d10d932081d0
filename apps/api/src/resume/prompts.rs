// Resume LLM prompt templates: skill categorisation and ATS resume copy.

/// Skill categorisation prompt. Replace `{trade}` and `{raw_skills}` before sending.
pub const SKILL_CATEGORIZATION_TEMPLATE: &str = r#"You are a skills categorization expert for blue-collar trades.

Trade: {trade}
Raw skills: {raw_skills}

Normalize, expand, and categorize these skills into:
1. Technical Skills - trade-specific abilities
2. Soft Skills - communication, teamwork, problem-solving
3. Tools & Equipment - specific tools they can use

Return JSON:
{
    "technical_skills": ["..."],
    "soft_skills": ["..."],
    "tools_equipment": ["..."]
}

Make skills professional and ATS-friendly."#;

pub fn skill_categorization_prompt(trade: &str, raw_skills: &[String]) -> String {
    SKILL_CATEGORIZATION_TEMPLATE
        .replace("{trade}", trade)
        .replace("{raw_skills}", &raw_skills.join(", "))
}

/// ATS resume copy prompt. Replace `{worker_json}` before sending.
pub const RESUME_COPY_TEMPLATE: &str = r#"Generate a professional, ATS-friendly, one-page resume for a blue-collar worker.

Worker Data:
{worker_json}

Requirements:
1. Professional SUMMARY (3-4 lines with quantifiable achievements)
2. EXPERIENCE section (action verbs, quantified results)
3. SKILLS section (categorized: Technical, Tools/Equipment, Soft Skills)
4. CERTIFICATIONS (if any)
5. EDUCATION (if any)

Use trade-specific keywords and phrases.
Format for easy parsing by ATS systems.
One page maximum.

Return plain text resume."#;

pub fn resume_copy_prompt(worker_json: &str) -> String {
    RESUME_COPY_TEMPLATE.replace("{worker_json}", worker_json)
}
