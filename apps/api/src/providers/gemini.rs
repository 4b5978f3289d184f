//! Gemini `generateContent` provider with an ordered model fallback list.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::prompts::{system_prompt, user_prompt};
use super::{
    http_client, send_with_retry, AnalysisProvider, AnalysisRequest, ProviderError, ProviderReply,
};
use crate::analysis::entities;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    /// Preferred model first, then fallbacks.
    models: Vec<String>,
}

impl GeminiProvider {
    pub fn new(api_key: String, models: Vec<String>) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client()?,
            api_key,
            models,
        })
    }

    async fn call_model(&self, model: &str, body: &GenerateRequest<'_>) -> Result<String, ProviderError> {
        let url = format!("{GEMINI_API_BASE}/{model}:generateContent");
        let response = send_with_retry("Gemini", || {
            self.client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(body)
        })
        .await?;

        let raw = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&raw)?;
        parsed.text().ok_or(ProviderError::EmptyContent)
    }
}

#[async_trait]
impl AnalysisProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(
        &self,
        request: &AnalysisRequest,
        today: NaiveDate,
    ) -> Result<ProviderReply, ProviderError> {
        let system = system_prompt(today);
        let prompt = user_prompt(&request.text, request.role.as_deref());
        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: [Part { text: &system }],
            },
            contents: [Content {
                role: Some("user"),
                parts: [Part { text: &prompt }],
            }],
        };

        let mut last_rejection = String::new();
        for model in &self.models {
            match self.call_model(model, &body).await {
                Ok(text) => {
                    debug!(model = %model, chars = text.len(), "Gemini call succeeded");
                    return Ok(ProviderReply {
                        text: entities::clean(&text),
                        provider: self.name(),
                        model: Some(model.clone()),
                    });
                }
                Err(e) if e.rejects_model() => {
                    warn!("Gemini model {model} rejected, trying next: {e}");
                    last_rejection = e.to_string();
                }
                Err(e) => return Err(e),
            }
        }

        Err(ProviderError::ModelRejected {
            tried: self.models.join(", "),
            message: last_rejection,
        })
    }
}
