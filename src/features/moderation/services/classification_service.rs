use serde_json::{json, Value};

use crate::core::config::LlmConfig;
use crate::features::moderation::clients::{
    GeminiClient, ModerationProvider, OpenAiClient, ProviderVerdict,
};
use crate::features::moderation::services::heuristic;
use crate::shared::constants::LABEL_SAFE;

/// Reasoning attached to every provider-failure fallback
pub const FALLBACK_REASONING: &str =
    "Provider error: unable to load model. Falling back to safe heuristic.";

/// Confidence for an image verdict after a provider failure
const IMAGE_FALLBACK_CONFIDENCE: f64 = 0.7;

/// Content submitted for classification
#[derive(Debug, Clone, Copy)]
pub enum SubmittedContent<'a> {
    Text(&'a str),
    Image(&'a [u8]),
}

/// Where a classification outcome came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationOrigin {
    /// The configured LLM provider answered
    Provider,
    /// The provider failed; the local heuristic answered instead
    Heuristic,
    /// No usable provider was configured
    Stub,
}

/// Normalized result of classifying one submission. The orchestrator never
/// fails: every provider problem is absorbed into a degraded outcome.
#[derive(Debug, Clone)]
pub struct ClassificationOutcome {
    pub label: String,
    pub confidence: f64,
    pub reasoning: String,
    pub raw_response: Value,
    pub origin: ClassificationOrigin,
}

impl ClassificationOutcome {
    pub fn is_safe(&self) -> bool {
        self.label == LABEL_SAFE
    }
}

/// Orchestrates provider selection and the heuristic fallback.
///
/// Clients are built once from configuration; a provider is attempted only
/// when it is selected, its credential is present and it supports the
/// submitted content kind.
pub struct ClassificationService {
    provider: String,
    openai: Option<OpenAiClient>,
    gemini: Option<GeminiClient>,
}

impl ClassificationService {
    pub fn new(config: &LlmConfig) -> Self {
        let openai = config
            .openai_api_key
            .as_ref()
            .map(|key| OpenAiClient::new(key.clone()));
        let gemini = config
            .google_api_key
            .as_ref()
            .map(|key| GeminiClient::new(key.clone(), config.gemini_model.clone()));

        Self {
            provider: config.provider.clone(),
            openai,
            gemini,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_clients(
        provider: &str,
        openai: Option<OpenAiClient>,
        gemini: Option<GeminiClient>,
    ) -> Self {
        Self {
            provider: provider.to_string(),
            openai,
            gemini,
        }
    }

    /// Classify a submission. `email` is used for audit logging only and is
    /// never sent to a provider.
    pub async fn classify(
        &self,
        email: &str,
        content: SubmittedContent<'_>,
    ) -> ClassificationOutcome {
        let (client, error_marker): (Option<&dyn ModerationProvider>, &str) =
            match (self.provider.as_str(), content) {
                ("openai", SubmittedContent::Text(_)) => (
                    self.openai.as_ref().map(|c| c as &dyn ModerationProvider),
                    "openai_error",
                ),
                // The OpenAI backend is text-only; image submissions fall
                // through to the stub path.
                ("gemini", _) => (
                    self.gemini.as_ref().map(|c| c as &dyn ModerationProvider),
                    "gemini_error",
                ),
                _ => (None, ""),
            };

        let Some(client) = client else {
            return self.stub_outcome(content);
        };

        let attempt = match content {
            SubmittedContent::Text(text) => client.classify_text(text).await,
            SubmittedContent::Image(image) => client.classify_image(image).await,
        };

        match attempt {
            Ok(verdict) => provider_outcome(verdict),
            Err(e) => {
                tracing::warn!(
                    "Provider {} failed for {}: {}. Using heuristic fallback.",
                    self.provider,
                    email,
                    e
                );
                fallback_outcome(content, error_marker)
            }
        }
    }

    /// Outcome when no provider is configured or usable for this content
    fn stub_outcome(&self, content: SubmittedContent<'_>) -> ClassificationOutcome {
        let verdict = match content {
            SubmittedContent::Text(text) => heuristic::classify_text(text),
            SubmittedContent::Image(_) => heuristic::image_stub_verdict(),
        };

        ClassificationOutcome {
            label: verdict.label.to_string(),
            confidence: verdict.confidence,
            reasoning: verdict.reason.to_string(),
            raw_response: json!({"provider": "stub"}),
            origin: ClassificationOrigin::Stub,
        }
    }
}

fn provider_outcome(verdict: ProviderVerdict) -> ClassificationOutcome {
    ClassificationOutcome {
        label: verdict.label,
        confidence: verdict.confidence,
        reasoning: verdict.reasoning,
        raw_response: verdict.raw,
        origin: ClassificationOrigin::Provider,
    }
}

/// Degraded outcome after a provider failure. Text falls back to the
/// heuristic label; images get a fixed safe verdict since their bytes are
/// never inspected locally.
fn fallback_outcome(content: SubmittedContent<'_>, error_marker: &str) -> ClassificationOutcome {
    let (label, confidence) = match content {
        SubmittedContent::Text(text) => {
            let v = heuristic::classify_text(text);
            (v.label, v.confidence)
        }
        SubmittedContent::Image(_) => (LABEL_SAFE, IMAGE_FALLBACK_CONFIDENCE),
    };

    ClassificationOutcome {
        label: label.to_string(),
        confidence,
        reasoning: FALLBACK_REASONING.to_string(),
        raw_response: json!({"error": error_marker}),
        origin: ClassificationOrigin::Heuristic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::LlmConfig;

    fn config_without_credentials() -> LlmConfig {
        LlmConfig {
            provider: "gemini".to_string(),
            openai_api_key: None,
            google_api_key: None,
            gemini_model: "gemini-1.5-pro".to_string(),
        }
    }

    fn unreachable_gemini() -> GeminiClient {
        GeminiClient::new("test-key".to_string(), "gemini-1.5-pro".to_string())
            .with_base_url("http://127.0.0.1:9")
    }

    fn unreachable_openai() -> OpenAiClient {
        OpenAiClient::new("test-key".to_string()).with_base_url("http://127.0.0.1:9/v1/chat")
    }

    #[tokio::test]
    async fn test_no_credentials_yields_stub_outcome() {
        let service = ClassificationService::new(&config_without_credentials());

        let outcome = service
            .classify("user@example.com", SubmittedContent::Text("hello there"))
            .await;

        assert_eq!(outcome.origin, ClassificationOrigin::Stub);
        assert_eq!(outcome.label, "safe");
        assert_eq!(outcome.confidence, 0.9);
        assert_eq!(outcome.reasoning, "No unsafe indicators found.");
        assert_eq!(outcome.raw_response, json!({"provider": "stub"}));
    }

    #[tokio::test]
    async fn test_stub_outcome_still_applies_heuristic_labels() {
        let service = ClassificationService::new(&config_without_credentials());

        let outcome = service
            .classify("user@example.com", SubmittedContent::Text("you are stupid"))
            .await;

        assert_eq!(outcome.origin, ClassificationOrigin::Stub);
        assert_eq!(outcome.label, "harassment");
        assert_eq!(outcome.confidence, 0.80);
    }

    #[tokio::test]
    async fn test_image_stub_outcome() {
        let service = ClassificationService::new(&config_without_credentials());

        let outcome = service
            .classify("user@example.com", SubmittedContent::Image(&[1, 2, 3]))
            .await;

        assert_eq!(outcome.origin, ClassificationOrigin::Stub);
        assert_eq!(outcome.label, "safe");
        assert_eq!(outcome.confidence, 0.8);
        assert_eq!(outcome.reasoning, "No unsafe indicators found (stub).");
    }

    #[tokio::test]
    async fn test_gemini_failure_falls_back_to_heuristic() {
        let service =
            ClassificationService::with_clients("gemini", None, Some(unreachable_gemini()));

        let outcome = service
            .classify("user@example.com", SubmittedContent::Text("free money now"))
            .await;

        assert_eq!(outcome.origin, ClassificationOrigin::Heuristic);
        assert_eq!(outcome.label, "spam");
        assert_eq!(outcome.confidence, 0.85);
        assert_eq!(outcome.reasoning, FALLBACK_REASONING);
        assert_eq!(outcome.raw_response, json!({"error": "gemini_error"}));
    }

    #[tokio::test]
    async fn test_gemini_image_failure_falls_back_to_fixed_safe_verdict() {
        let service =
            ClassificationService::with_clients("gemini", None, Some(unreachable_gemini()));

        let outcome = service
            .classify("user@example.com", SubmittedContent::Image(&[0u8; 16]))
            .await;

        assert_eq!(outcome.origin, ClassificationOrigin::Heuristic);
        assert_eq!(outcome.label, "safe");
        assert_eq!(outcome.confidence, 0.7);
        assert_eq!(outcome.reasoning, FALLBACK_REASONING);
        assert_eq!(outcome.raw_response, json!({"error": "gemini_error"}));
    }

    #[tokio::test]
    async fn test_openai_failure_falls_back_to_heuristic() {
        let service =
            ClassificationService::with_clients("openai", Some(unreachable_openai()), None);

        let outcome = service
            .classify("user@example.com", SubmittedContent::Text("all good here"))
            .await;

        assert_eq!(outcome.origin, ClassificationOrigin::Heuristic);
        assert_eq!(outcome.label, "safe");
        assert_eq!(outcome.raw_response, json!({"error": "openai_error"}));
    }

    #[tokio::test]
    async fn test_openai_image_submission_uses_stub_path() {
        // OpenAI backend is text-only, so an image submission with an
        // OpenAI key configured is the same as having no provider.
        let service =
            ClassificationService::with_clients("openai", Some(unreachable_openai()), None);

        let outcome = service
            .classify("user@example.com", SubmittedContent::Image(&[9u8; 8]))
            .await;

        assert_eq!(outcome.origin, ClassificationOrigin::Stub);
        assert_eq!(outcome.raw_response, json!({"provider": "stub"}));
    }

    #[tokio::test]
    async fn test_unknown_provider_selector_yields_stub() {
        let service =
            ClassificationService::with_clients("anthropic", None, Some(unreachable_gemini()));

        let outcome = service
            .classify("user@example.com", SubmittedContent::Text("hello"))
            .await;

        assert_eq!(outcome.origin, ClassificationOrigin::Stub);
    }
}
