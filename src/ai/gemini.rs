//! Google Generative Language (Gemini) REST client.
//!
//! Endpoint: POST {base}/models/{model}:generateContent
//! Auth: `x-goog-api-key` header
//!
//! Single request/response, no streaming, no retry.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::AiSettings;

use super::{AiError, Content, GenerateRequest, GenerateResponse, GenerativeModel, Part};

/// Gemini REST client
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

/// Google error wrapper
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    code: Option<u16>,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    text: Option<String>,
    inline_data: Option<WireInlineData>,
    /// Reasoning summaries are not part of the answer
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GeminiClient {
    /// Create a client. Without an API key every call fails with
    /// [`AiError::MissingApiKey`].
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
        })
    }

    /// Create from resolved settings
    pub fn from_settings(settings: &AiSettings) -> Result<Self, AiError> {
        Self::new(
            settings.api_key.clone(),
            settings.base_url.clone(),
            Duration::from_secs(settings.timeout_seconds),
        )
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build the generateContent URL for `model`
    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

fn part_to_json(part: &Part) -> Value {
    match part {
        Part::Text(text) => json!({ "text": text }),
        Part::InlineData { mime_type, data } => json!({
            "inlineData": {
                "mimeType": mime_type,
                "data": STANDARD.encode(data),
            }
        }),
    }
}

fn content_to_json(content: &Content) -> Value {
    json!({
        "role": content.role.as_str(),
        "parts": content.parts.iter().map(part_to_json).collect::<Vec<_>>(),
    })
}

/// Build the JSON body for a request
fn build_request_body(request: &GenerateRequest) -> Value {
    let mut body = json!({
        "contents": request.contents.iter().map(content_to_json).collect::<Vec<_>>(),
    });

    if let Some(ref instruction) = request.system_instruction {
        body["systemInstruction"] = json!({ "parts": [{ "text": instruction }] });
    }

    let mut generation_config = serde_json::Map::new();
    if let Some(budget) = request.thinking_budget {
        generation_config.insert(
            "thinkingConfig".to_string(),
            json!({ "thinkingBudget": budget }),
        );
    }
    if request.want_image {
        generation_config.insert("responseModalities".to_string(), json!(["TEXT", "IMAGE"]));
    }
    if !generation_config.is_empty() {
        body["generationConfig"] = Value::Object(generation_config);
    }

    body
}

/// Convert the wire response of the first candidate
fn parse_response(wire: WireResponse) -> Result<GenerateResponse, AiError> {
    let Some(candidate) = wire.candidates.into_iter().next() else {
        if let Some(reason) = wire.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(AiError::Blocked(reason));
        }
        return Err(AiError::EmptyResponse);
    };

    let mut parts = Vec::new();
    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if part.thought {
            continue;
        }
        if let Some(text) = part.text {
            parts.push(Part::Text(text));
        }
        if let Some(inline) = part.inline_data {
            parts.push(Part::InlineData {
                mime_type: inline.mime_type,
                data: STANDARD.decode(inline.data.as_bytes())?,
            });
        }
    }

    if parts.is_empty() {
        return Err(AiError::EmptyResponse);
    }
    Ok(GenerateResponse { parts })
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::MissingApiKey)?;
        let body = build_request_body(&request);

        tracing::debug!(model = %request.model, turns = request.contents.len(), "Calling Gemini");

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            let message = match serde_json::from_str::<ErrorResponse>(&error_text) {
                Ok(parsed) => {
                    return Err(AiError::Api {
                        status: parsed.error.code.unwrap_or(status.as_u16()),
                        message: parsed.error.message,
                    })
                }
                Err(_) => error_text,
            };

            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let wire: WireResponse = response.json().await?;
        parse_response(wire)
    }
}
