//! Generative-AI pass-through.
//!
//! [`GenerativeModel`] is the seam to the external service; [`GeminiClient`]
//! is the HTTP implementation. [`AiService`] sits on top and turns every
//! failure into a user-facing French message, so callers never handle an
//! error.

pub mod gemini;
pub mod prompts;
pub mod service;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ChatRole;

pub use gemini::GeminiClient;
pub use service::{AiService, FALLBACK_CHAT, FALLBACK_EMPTY, FALLBACK_THINKING};

/// Errors from a generative model call
#[derive(Debug, Error)]
pub enum AiError {
    #[error("No API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Prompt blocked: {0}")]
    Blocked(String),

    #[error("Response contained no usable content")]
    EmptyResponse,

    #[error("Invalid image data: {0}")]
    InvalidImage(#[from] base64::DecodeError),
}

/// One piece of a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    /// Raw bytes with their MIME type (images)
    InlineData { mime_type: String, data: Vec<u8> },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text(text.into())
    }
}

/// A message turn sent to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub role: ChatRole,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: ChatRole::User,
            parts,
        }
    }

    pub fn user_text(text: impl Into<String>) -> Self {
        Self::user(vec![Part::text(text)])
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            parts: vec![Part::text(text)],
        }
    }
}

/// A single generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub model: String,
    pub system_instruction: Option<String>,
    pub contents: Vec<Content>,
    /// Token budget for models that reason before answering
    pub thinking_budget: Option<u32>,
    /// Ask for image output alongside text
    pub want_image: bool,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, contents: Vec<Content>) -> Self {
        Self {
            model: model.into(),
            system_instruction: None,
            contents,
            thinking_budget: None,
            want_image: false,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_thinking_budget(mut self, budget: u32) -> Self {
        self.thinking_budget = Some(budget);
        self
    }

    pub fn with_image_output(mut self) -> Self {
        self.want_image = true;
        self
    }
}

/// Parts returned by the model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateResponse {
    pub parts: Vec<Part>,
}

impl GenerateResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::text(text)],
        }
    }

    /// Concatenated text parts, `None` if there is no non-blank text
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// First inline image part as `(mime_type, bytes)`
    pub fn first_image(&self) -> Option<(&str, &[u8])> {
        self.parts.iter().find_map(|p| match p {
            Part::InlineData { mime_type, data } if mime_type.starts_with("image/") => {
                Some((mime_type.as_str(), data.as_slice()))
            }
            _ => None,
        })
    }
}

/// Trait for generative model backends
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Run one request/response round trip
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, AiError>;
}
