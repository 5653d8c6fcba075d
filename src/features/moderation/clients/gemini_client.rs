use async_trait::async_trait;
use base64::prelude::*;
use serde_json::{json, Value};
use std::time::Duration;

use super::provider::{verdict_from_model_text, ModerationProvider, ProviderError, ProviderVerdict};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Pro-tier model allow-list: a configured model outside this set is ignored
const PRO_MODEL_ALLOW_LIST: [&str; 3] = ["gemini-1.5-pro", "gemini-1.5-pro-latest", "gemini-pro"];

/// Default candidates, tried in order after the configured model
const DEFAULT_MODELS: [&str; 3] = ["gemini-1.5-pro", "gemini-1.5-pro-latest", "gemini-pro"];

/// Protocol versions to try, outer loop of the fallback iteration
const PROTOCOL_VERSIONS: [&str; 1] = ["v1beta"];

const TEXT_TIMEOUT: Duration = Duration::from_secs(20);
const IMAGE_TIMEOUT: Duration = Duration::from_secs(30);

const TEXT_INSTRUCTION: &str = "You are a content moderation classifier. Reply with JSON only: \
{classification: one of [toxic, spam, harassment, safe], confidence: 0..1, reasoning: short}.";

const IMAGE_INSTRUCTION: &str =
    "You are an image content moderation classifier. Reply with JSON only: \
{classification: one of [toxic, spam, harassment, safe], confidence: 0..1, reasoning: short}.";

/// Generate-content-style backend with multimodal (inline base64 image)
/// support. Tries an ordered list of model candidates per protocol version;
/// first success wins, exhaustion propagates the last error.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    preferred_model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, preferred_model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            preferred_model,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Ordered candidate models: the configured one only if it is a
    /// pro-tier variant, then the fixed defaults.
    fn candidate_models(&self) -> Vec<&str> {
        let mut models = Vec::with_capacity(DEFAULT_MODELS.len() + 1);
        if PRO_MODEL_ALLOW_LIST.contains(&self.preferred_model.as_str()) {
            models.push(self.preferred_model.as_str());
        }
        models.extend(DEFAULT_MODELS);
        models
    }

    /// Iterate protocol versions (outer) and candidate models (inner),
    /// accumulating the last error. Returns on the first success.
    async fn attempt_candidates(
        &self,
        payload: &Value,
        timeout: Duration,
    ) -> Result<ProviderVerdict, ProviderError> {
        let mut last_error =
            ProviderError::MalformedResponse("no candidate model attempted".to_string());

        for version in PROTOCOL_VERSIONS {
            for model in self.candidate_models() {
                let url = format!(
                    "{}/{}/models/{}:generateContent?key={}",
                    self.base_url, version, model, self.api_key
                );
                match self.attempt(&url, payload, timeout).await {
                    Ok(verdict) => return Ok(verdict),
                    Err(e) => {
                        tracing::debug!(
                            "Gemini attempt failed (version={}, model={}): {}",
                            version,
                            model,
                            e
                        );
                        last_error = e;
                    }
                }
            }
        }

        Err(last_error)
    }

    async fn attempt(
        &self,
        url: &str,
        payload: &Value,
        timeout: Duration,
    ) -> Result<ProviderVerdict, ProviderError> {
        let resp = self
            .http
            .post(url)
            .json(payload)
            .timeout(timeout)
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

        let candidates = data
            .get("candidates")
            .and_then(Value::as_array)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                ProviderError::MalformedResponse("no candidates in response".to_string())
            })?;

        let parts = candidates[0]
            .pointer("/content/parts")
            .and_then(Value::as_array)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                ProviderError::MalformedResponse("no parts in response candidate".to_string())
            })?;

        let model_text = parts[0]
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();

        Ok(verdict_from_model_text(&model_text, data))
    }
}

#[async_trait]
impl ModerationProvider for GeminiClient {
    async fn classify_text(&self, text: &str) -> Result<ProviderVerdict, ProviderError> {
        let prompt = format!("{}\n\nText:\n{}", TEXT_INSTRUCTION, text);
        let payload = json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {"temperature": 0.0, "maxOutputTokens": 512},
        });

        self.attempt_candidates(&payload, TEXT_TIMEOUT).await
    }

    async fn classify_image(&self, image: &[u8]) -> Result<ProviderVerdict, ProviderError> {
        let encoded = BASE64_STANDARD.encode(image);
        let payload = json!({
            "contents": [{
                "parts": [
                    {"text": IMAGE_INSTRUCTION},
                    {"inline_data": {"mime_type": "image/png", "data": encoded}},
                ]
            }],
        });

        self.attempt_candidates(&payload, IMAGE_TIMEOUT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_model(model: &str) -> GeminiClient {
        GeminiClient::new("test-key".to_string(), model.to_string())
    }

    #[test]
    fn test_candidates_include_preferred_pro_model_first() {
        let client = client_with_model("gemini-pro");
        let models = client.candidate_models();
        assert_eq!(models[0], "gemini-pro");
        // defaults always follow, even when the preferred model repeats
        assert_eq!(
            &models[1..],
            &["gemini-1.5-pro", "gemini-1.5-pro-latest", "gemini-pro"]
        );
    }

    #[test]
    fn test_candidates_ignore_non_pro_model() {
        let client = client_with_model("gemini-1.5-flash");
        assert_eq!(
            client.candidate_models(),
            vec!["gemini-1.5-pro", "gemini-1.5-pro-latest", "gemini-pro"]
        );
    }

    #[test]
    fn test_candidates_ignore_arbitrary_model_name() {
        let client = client_with_model("my-custom-model");
        assert_eq!(client.candidate_models().len(), DEFAULT_MODELS.len());
    }

    #[tokio::test]
    async fn test_exhausted_candidates_propagate_last_error() {
        // Every candidate hits an unreachable endpoint; the accumulated
        // error must be a transport failure, not the placeholder.
        let client = client_with_model("gemini-1.5-pro").with_base_url("http://127.0.0.1:9");

        let err = client.classify_text("hello").await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)));
    }
}
