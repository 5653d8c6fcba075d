use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use super::provider::{verdict_from_model_text, ModerationProvider, ProviderError, ProviderVerdict};

const OPENAI_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-4o-mini";
const TEXT_TIMEOUT: Duration = Duration::from_secs(20);

const SYSTEM_PROMPT: &str = "You are a content moderation classifier. Reply with JSON: \
{classification: one of [toxic, spam, harassment, safe], confidence: 0..1, reasoning: short}.";

/// Chat-completion-style backend. Text only; image classification is not
/// wired through this provider.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: OPENAI_CHAT_COMPLETIONS_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ModerationProvider for OpenAiClient {
    async fn classify_text(&self, text: &str) -> Result<ProviderVerdict, ProviderError> {
        let payload = json!({
            "model": OPENAI_MODEL,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": format!(
                    "Classify the following text for policy compliance:\n\n{}", text
                )},
            ],
            "temperature": 0.0,
        });

        let resp = self
            .http
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(TEXT_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::UnexpectedStatus { status, body });
        }

        let data: Value = resp
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let content = data
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ProviderError::MalformedResponse("no message content in response".to_string())
            })?
            .to_string();

        Ok(verdict_from_model_text(&content, data))
    }

    async fn classify_image(&self, _image: &[u8]) -> Result<ProviderVerdict, ProviderError> {
        Err(ProviderError::Unsupported(
            "image classification is not supported by the OpenAI backend",
        ))
    }
}
