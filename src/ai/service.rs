//! User-facing AI operations with French fallbacks.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::config::AiSettings;
use crate::domain::{ChatMessage, ChatRole};

use super::prompts::{self, DaoBrief, PitchBrief};
use super::{AiError, Content, GenerateRequest, GenerativeModel, Part};

/// Shown when the chat call fails
pub const FALLBACK_CHAT: &str = "Désolé, je rencontre des difficultés pour me connecter au Cerveau Numérique. Veuillez réessayer dans quelques instants.";

/// Shown when an analysis/generation call fails
pub const FALLBACK_THINKING: &str = "Désolé, une erreur est survenue lors de l'analyse. Veuillez réessayer plus tard.";

/// Shown when the model answered without any text
pub const FALLBACK_EMPTY: &str = "Je n'ai pas pu générer de réponse. Veuillez reformuler votre demande.";

/// AI features over any [`GenerativeModel`].
///
/// None of these methods return an error: failures are logged and replaced
/// by a non-empty message (or `None` for images).
pub struct AiService {
    model: Arc<dyn GenerativeModel>,
    settings: AiSettings,
}

impl AiService {
    pub fn new(model: Arc<dyn GenerativeModel>, settings: AiSettings) -> Self {
        Self { model, settings }
    }

    /// Answer `input` in the context of `history` (oldest first).
    ///
    /// Leading model turns (the welcome message) are not sent: a
    /// conversation sent to the model starts with the user.
    pub async fn generate_chat_response(&self, input: &str, history: &[ChatMessage]) -> String {
        let mut contents: Vec<Content> = history
            .iter()
            .skip_while(|m| m.role == ChatRole::Model)
            .map(|m| Content {
                role: m.role,
                parts: vec![Part::text(m.text.clone())],
            })
            .collect();
        contents.push(Content::user_text(input));

        let request = GenerateRequest::new(self.settings.chat_model.clone(), contents)
            .with_system_instruction(prompts::CHAT_SYSTEM_INSTRUCTION);

        self.text_or(request, FALLBACK_CHAT).await
    }

    /// Long-form answer from the reasoning model
    pub async fn generate_thinking_response(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
    ) -> String {
        let mut request = GenerateRequest::new(
            self.settings.thinking_model.clone(),
            vec![Content::user_text(prompt)],
        )
        .with_thinking_budget(self.settings.thinking_budget);

        if let Some(instruction) = system_instruction {
            request = request.with_system_instruction(instruction);
        }

        self.text_or(request, FALLBACK_THINKING).await
    }

    /// Edit a base64-encoded image according to `prompt`.
    ///
    /// Returns the base64-encoded result, or `None` on any failure.
    pub async fn edit_image(
        &self,
        base64_image: &str,
        mime_type: &str,
        prompt: &str,
    ) -> Option<String> {
        let bytes = match STANDARD.decode(base64_image.trim()) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %AiError::from(e), "Image edit input rejected");
                return None;
            }
        };

        self.edit_image_bytes(&bytes, mime_type, prompt)
            .await
            .map(|(_, data)| STANDARD.encode(data))
    }

    /// Edit raw image bytes; returns `(mime_type, bytes)` of the result
    pub async fn edit_image_bytes(
        &self,
        image: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Option<(String, Vec<u8>)> {
        let request = GenerateRequest::new(
            self.settings.image_model.clone(),
            vec![Content::user(vec![
                Part::InlineData {
                    mime_type: mime_type.to_string(),
                    data: image.to_vec(),
                },
                Part::text(prompt),
            ])],
        )
        .with_image_output();

        match self.model.generate(request).await {
            Ok(response) => match response.first_image() {
                Some((mime, data)) => Some((mime.to_string(), data.to_vec())),
                None => {
                    tracing::warn!(backend = self.model.name(), "Image edit returned no image");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(backend = self.model.name(), error = %e, "Image edit failed");
                None
            }
        }
    }

    /// Study guide for a course topic
    pub async fn study_guide(&self, course_topic: &str) -> String {
        self.generate_thinking_response(
            &prompts::study_guide(course_topic),
            Some(prompts::STUDY_GUIDE_SYSTEM_INSTRUCTION),
        )
        .await
    }

    /// Public-tender risk analysis
    pub async fn dao_analysis(&self, brief: &DaoBrief) -> String {
        self.generate_thinking_response(&prompts::dao_analysis(brief), None)
            .await
    }

    /// Pitch deck outline
    pub async fn pitch_deck(&self, brief: &PitchBrief) -> String {
        self.generate_thinking_response(&prompts::pitch_deck(brief), None)
            .await
    }

    /// Podcast script
    pub async fn podcast_script(&self, topic: &str) -> String {
        self.generate_thinking_response(&prompts::podcast_script(topic), None)
            .await
    }

    async fn text_or(&self, request: GenerateRequest, fallback: &str) -> String {
        let model = request.model.clone();
        match self.model.generate(request).await {
            Ok(response) => response.text().unwrap_or_else(|| {
                tracing::warn!(%model, "Model returned no text");
                FALLBACK_EMPTY.to_string()
            }),
            Err(e) => {
                tracing::warn!(backend = self.model.name(), %model, error = %e, "AI call failed");
                fallback.to_string()
            }
        }
    }
}
