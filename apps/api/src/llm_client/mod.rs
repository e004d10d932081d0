/// LLM Client: the single point of entry for all Gemini API calls in SkillLink.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All collaborator interactions go through the `LanguageModel` trait, which
/// `LlmClient` implements for production and a scripted fake implements in tests.
///
/// Models are hardcoded per tier to prevent drift.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;
#[cfg(test)]
pub mod testing;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Conversational, categorisation and translation calls.
pub const FAST_MODEL: &str = "gemini-2.5-flash";
/// Extraction, matching and resume copy calls.
pub const PRO_MODEL: &str = "gemini-2.5-pro";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Gemini API key not configured. Set GEMINI_API_KEY (or GOOGLE_API_KEY)")]
    NotConfigured,

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    Fast,
    Pro,
}

impl ModelTier {
    pub fn model_name(self) -> &'static str {
        match self {
            ModelTier::Fast => FAST_MODEL,
            ModelTier::Pro => PRO_MODEL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

impl Role {
    fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

/// One request to the external collaborator. Built with the chained helpers
/// below; the last message is the newest utterance or the prompt.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub tier: ModelTier,
    pub system: Option<String>,
    pub messages: Vec<Message>,
    pub temperature: Option<f32>,
    /// Strict structured-output mode (`application/json` response).
    pub json_output: bool,
}

impl GenerationRequest {
    pub fn prompt(tier: ModelTier, prompt: impl Into<String>) -> Self {
        Self {
            tier,
            system: None,
            messages: vec![Message {
                role: Role::User,
                text: prompt.into(),
            }],
            temperature: None,
            json_output: false,
        }
    }

    /// A conversation: prior turns followed by the new user utterance.
    pub fn conversation(tier: ModelTier, history: Vec<Message>, utterance: impl Into<String>) -> Self {
        let mut messages = history;
        messages.push(Message {
            role: Role::User,
            text: utterance.into(),
        });
        Self {
            tier,
            system: None,
            messages,
            temperature: None,
            json_output: false,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn json(mut self) -> Self {
        self.json_output = true;
        self
    }

    /// Text of the final message, i.e. the prompt or newest utterance.
    pub fn last_text(&self) -> &str {
        self.messages.last().map(|m| m.text.as_str()).unwrap_or("")
    }
}

/// The narrow request/response seam every AI-backed component talks through.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, LlmError>;
}

/// Calls the model in structured-output mode and deserializes the reply.
pub async fn generate_json<T: DeserializeOwned>(
    llm: &dyn LanguageModel,
    request: GenerationRequest,
) -> Result<T, LlmError> {
    let text = llm.generate(request.json()).await?;
    serde_json::from_str(strip_json_fences(&text)).map_err(LlmError::Parse)
}

// Gemini wire format

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent<'a>>,
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate, if it has any.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

fn to_wire(request: &GenerationRequest) -> GeminiRequest<'_> {
    GeminiRequest {
        system_instruction: request.system.as_deref().map(|text| GeminiContent {
            role: None,
            parts: vec![GeminiPart { text }],
        }),
        contents: request
            .messages
            .iter()
            .map(|m| GeminiContent {
                role: Some(m.role.as_str()),
                parts: vec![GeminiPart { text: &m.text }],
            })
            .collect(),
        generation_config: GeminiGenerationConfig {
            temperature: request.temperature,
            response_mime_type: request.json_output.then_some("application/json"),
        },
    }
}

/// Retry and timeout policy for collaborator calls. The defaults attempt each
/// call exactly once with no client-side timeout.
#[derive(Debug, Clone, Copy)]
pub struct LlmPolicy {
    pub max_attempts: u32,
    pub timeout: Option<Duration>,
}

impl Default for LlmPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            timeout: None,
        }
    }
}

/// The single Gemini client shared by every component.
/// Created once at startup and injected through `AppState`.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    policy: LlmPolicy,
}

impl LlmClient {
    pub fn new(api_key: Option<String>, policy: LlmPolicy) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = policy.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            api_key,
            policy,
        })
    }

    /// Makes a raw call to the Gemini API, returning the full response object.
    /// Retries on 429 and 5xx only when the policy allows more than one attempt.
    pub async fn call(&self, request: &GenerationRequest) -> Result<GeminiResponse, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::NotConfigured)?;
        let url = format!(
            "{GEMINI_API_BASE}/models/{}:generateContent",
            request.tier.model_name()
        );
        let body = to_wire(request);
        let max_attempts = self.policy.max_attempts.max(1);

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..max_attempts {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1).min(5)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", api_key)
                .json(&body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GeminiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let gemini_response: GeminiResponse = response.json().await?;

            if let Some(usage) = &gemini_response.usage_metadata {
                debug!(
                    "LLM call succeeded: model={}, prompt_tokens={}, output_tokens={}",
                    request.tier.model_name(),
                    usage.prompt_token_count,
                    usage.candidates_token_count
                );
            }

            return Ok(gemini_response);
        }

        Err(last_error.unwrap_or(LlmError::EmptyContent))
    }
}

#[async_trait]
impl LanguageModel for LlmClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, LlmError> {
        let response = self.call(&request).await?;
        response.text().ok_or(LlmError::EmptyContent)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
