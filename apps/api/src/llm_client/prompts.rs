// Shared prompt fragments.
// Each component that needs collaborator calls defines its own prompts.rs alongside it.

/// System instruction for every structured-output call.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
