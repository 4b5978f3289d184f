/// Analysis providers: the only place resume text leaves the process.
///
/// A provider turns an [`AnalysisRequest`] into review text. Hosted providers
/// (OpenAI, Gemini) go through [`send_with_retry`]; the heuristic provider
/// runs the local analyzer and needs no network.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::{Config, ProviderKind};

pub mod gemini;
pub mod heuristic;
pub mod openai;
pub mod prompts;

pub use gemini::GeminiProvider;
pub use heuristic::HeuristicProvider;
pub use openai::OpenAiProvider;

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Provider returned empty content")]
    EmptyContent,

    #[error("Every model was rejected ({tried}): {message}")]
    ModelRejected { tried: String, message: String },
}

impl ProviderError {
    /// Statuses a hosted API uses when the model id itself is not usable.
    pub fn rejects_model(&self) -> bool {
        matches!(self, ProviderError::Api { status: 400 | 403 | 404, .. })
    }
}

/// Input to a provider. `text` is what the model sees, already masked when
/// masking is on.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub text: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderReply {
    pub text: String,
    pub provider: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether requests leave the process.
    fn is_hosted(&self) -> bool {
        true
    }

    async fn generate(
        &self,
        request: &AnalysisRequest,
        today: NaiveDate,
    ) -> Result<ProviderReply, ProviderError>;
}

/// Builds the provider selected by the configuration.
pub fn from_config(config: &Config) -> Result<Arc<dyn AnalysisProvider>, ProviderError> {
    let provider: Arc<dyn AnalysisProvider> = match config.provider {
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(
            config.openai_api_key.clone().unwrap_or_default(),
            config.openai_model.clone(),
        )?),
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(
            config.gemini_api_key.clone().unwrap_or_default(),
            config.gemini_models(),
        )?),
        ProviderKind::Mock => Arc::new(HeuristicProvider),
    };
    Ok(provider)
}

pub(crate) fn http_client() -> Result<Client, ProviderError> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Sends the request built by `build`, retrying 429 and 5xx responses with
/// exponential backoff. Any other non-success status is returned as
/// [`ProviderError::Api`] without retrying.
pub(crate) async fn send_with_retry<F>(label: &str, build: F) -> Result<Response, ProviderError>
where
    F: Fn() -> RequestBuilder,
{
    let mut last_error: Option<ProviderError> = None;

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            // 1s, 2s
            let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
            warn!(
                "{label} call attempt {attempt} failed, retrying after {}ms...",
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        let response = match build().send().await {
            Ok(r) => r,
            Err(e) => {
                last_error = Some(ProviderError::Http(e));
                continue;
            }
        };

        let status = response.status();

        if status.as_u16() == 429 || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!("{label} API returned {status}: {body}");
            last_error = Some(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
            continue;
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            });
        }

        return Ok(response);
    }

    Err(last_error.unwrap_or(ProviderError::RateLimited {
        retries: MAX_RETRIES,
    }))
}

/// Pulls `error.message` out of an API error body, falling back to the body.
fn api_error_message(body: String) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_from_envelope() {
        let body = r#"{"error": {"message": "model not found", "code": 404}}"#.to_string();
        assert_eq!(api_error_message(body), "model not found");
    }

    #[test]
    fn test_api_error_message_falls_back_to_body() {
        assert_eq!(api_error_message("Bad Gateway".to_string()), "Bad Gateway");
    }

    #[test]
    fn test_model_rejection_statuses() {
        for status in [400, 403, 404] {
            let err = ProviderError::Api {
                status,
                message: String::new(),
            };
            assert!(err.rejects_model());
        }
        let err = ProviderError::Api {
            status: 401,
            message: String::new(),
        };
        assert!(!err.rejects_model());
        assert!(!ProviderError::EmptyContent.rejects_model());
    }

    #[test]
    fn test_reply_omits_missing_model() {
        let reply = ProviderReply {
            text: "x".to_string(),
            provider: "mock",
            model: None,
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert!(json.get("model").is_none());
    }
}
