//! OpenAI chat-completions provider.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompts::{system_prompt, user_prompt};
use super::{
    http_client, send_with_retry, AnalysisProvider, AnalysisRequest, ProviderError, ProviderReply,
};
use crate::analysis::entities;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const TEMPERATURE: f32 = 0.2;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client()?,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl AnalysisProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(
        &self,
        request: &AnalysisRequest,
        today: NaiveDate,
    ) -> Result<ProviderReply, ProviderError> {
        let system = system_prompt(today);
        let prompt = user_prompt(&request.text, request.role.as_deref());
        let body = ChatRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        let response = send_with_retry("OpenAI", || {
            self.client
                .post(OPENAI_API_URL)
                .bearer_auth(&self.api_key)
                .json(&body)
        })
        .await?;

        let raw = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&raw)?;
        let text = parsed.text().ok_or(ProviderError::EmptyContent)?;
        debug!(model = %self.model, chars = text.len(), "OpenAI call succeeded");

        Ok(ProviderReply {
            text: entities::clean(text),
            provider: self.name(),
            model: Some(self.model.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            temperature: TEMPERATURE,
            messages: [
                ChatMessage {
                    role: "system",
                    content: "s",
                },
                ChatMessage {
                    role: "user",
                    content: "u",
                },
            ],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "u");
    }

    #[test]
    fn test_reply_text_from_first_choice() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Güçlü Yönler\n- A"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.text(), Some("Güçlü Yönler\n- A"));
    }

    #[test]
    fn test_blank_reply_is_empty() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  "}}]}"#).unwrap();
        assert_eq!(parsed.text(), None);
        let parsed: ChatResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(parsed.text(), None);
    }
}
