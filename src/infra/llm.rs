use async_trait::async_trait;
use reqwest::{
    Client,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OpenAiSettings;
use crate::error::{AppError, AppResult};
use crate::services::LanguageModelService;

const TEMPERATURE: f32 = 0.5;
const MAX_TOKENS: u32 = 256;

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct OpenAiClient {
    http: Client,
    settings: OpenAiSettings,
}

impl OpenAiClient {
    pub fn new(settings: OpenAiSettings) -> Self {
        Self {
            http: Client::new(),
            settings,
        }
    }

    fn completions_endpoint(base_url: &str) -> String {
        format!("{}/chat/completions", base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LanguageModelService for OpenAiClient {
    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn complete(&self, prompt: &str) -> AppResult<String> {
        let request_body = ChatRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let endpoint = Self::completions_endpoint(&self.settings.base_url);
        debug!(%endpoint, model = %self.settings.model, "requesting completion");

        let response = self
            .http
            .post(endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", self.settings.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|err| {
                AppError::LanguageModel(format!("failed to call completion endpoint: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::LanguageModel(format!(
                "completion endpoint responded with {status}: {body}"
            )));
        }

        let payload: ChatResponse = response.json().await.map_err(|err| {
            AppError::LanguageModel(format!("failed to parse completion response: {err}"))
        })?;

        let text = payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AppError::LanguageModel(
                "language model returned an empty completion".to_string(),
            ));
        }
        Ok(text)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
