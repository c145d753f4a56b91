use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::config::AiConfig;
use crate::error::{AdvisorError, AdvisorResult};

/// Role of one prior turn as the backend understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Model,
}

impl TurnRole {
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Model => "model",
        }
    }
}

/// One prior exchange turn threaded into a follow-up request.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryTurn {
    pub role: TurnRole,
    pub text: String,
}

impl HistoryTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: TurnRole::User, text: text.into() }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self { role: TurnRole::Model, text: text.into() }
    }
}

/// Everything a schema-constrained generation call needs: the prompt, the
/// JSON shape the reply must take, and optionally a system instruction and
/// prior turns for conversational use.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub response_schema: Value,
    pub system_instruction: Option<String>,
    pub history: Vec<HistoryTurn>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, response_schema: Value) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema,
            system_instruction: None,
            history: Vec::new(),
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_history(mut self, history: Vec<HistoryTurn>) -> Self {
        self.history = history;
        self
    }
}

/// The seam between the advisory logic and whichever model backend serves
/// it. Implementations return the raw reply text; decoding it against the
/// requested schema is the caller's job.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> AdvisorResult<String>;
}

// Wire format of the generative language API. Kept private; the rest of the
// crate only sees GenerationRequest and the reply text.

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, or None when the reply
    /// carries no usable text at all.
    fn primary_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        if content.parts.is_empty() {
            return None;
        }
        Some(content.parts.iter().map(|part| part.text.as_str()).collect())
    }
}

impl From<&GenerationRequest> for GenerateContentRequest {
    fn from(request: &GenerationRequest) -> Self {
        let mut contents: Vec<Content> = request
            .history
            .iter()
            .map(|turn| Content {
                role: turn.role.as_wire_str().to_string(),
                parts: vec![Part { text: turn.text.clone() }],
            })
            .collect();
        contents.push(Content {
            role: TurnRole::User.as_wire_str().to_string(),
            parts: vec![Part { text: request.prompt.clone() }],
        });

        GenerateContentRequest {
            contents,
            system_instruction: request.system_instruction.as_ref().map(|text| SystemInstruction {
                parts: vec![Part { text: text.clone() }],
            }),
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: request.response_schema.clone(),
            },
        }
    }
}

/// Client for the hosted generative language API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &AiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(concat!("agriyield/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        if config.api_key.is_empty() {
            log::warn!("No API key configured; requests will be rejected by the backend");
        }

        Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> AdvisorResult<String> {
        let wire_request = GenerateContentRequest::from(&request);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&wire_request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ApiErrorBody>(&error_text)
                .map(|body| body.error.message)
                .unwrap_or(error_text);
            return Err(AdvisorError::Backend { status: status.as_u16(), message });
        }

        let body = response.text().await?;
        let reply: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &reply.usage_metadata {
            log::debug!(
                "generation used {} prompt + {} reply tokens ({} total)",
                usage.prompt_token_count,
                usage.candidates_token_count,
                usage.total_token_count
            );
        }

        reply
            .primary_text()
            .ok_or_else(|| AdvisorError::schema("reply carries no candidate text"))
    }
}
