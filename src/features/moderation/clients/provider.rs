use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::shared::constants::LABEL_SAFE;
use crate::shared::llm::extract_json_object;

/// Confidence applied when the model output carries no usable value
pub const DEFAULT_CONFIDENCE: f64 = 0.7;

/// Typed failure modes of an LLM backend call.
///
/// All of these are absorbed by the classification orchestrator and
/// converted into a heuristic fallback; none reaches the HTTP caller.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

/// Successful classification from an LLM backend.
///
/// `raw` is the full provider response envelope, persisted verbatim for
/// audit; consumers treat it as opaque.
#[derive(Debug, Clone)]
pub struct ProviderVerdict {
    pub label: String,
    pub confidence: f64,
    pub reasoning: String,
    pub raw: Value,
}

/// Common capability of the interchangeable LLM backends
#[async_trait]
pub trait ModerationProvider: Send + Sync {
    async fn classify_text(&self, text: &str) -> Result<ProviderVerdict, ProviderError>;

    async fn classify_image(&self, image: &[u8]) -> Result<ProviderVerdict, ProviderError>;
}

/// Build a verdict from the free-form text a model produced.
///
/// The embedded JSON object is extracted leniently; a missing or
/// unparseable object degrades to safe defaults rather than an error.
pub(crate) fn verdict_from_model_text(model_text: &str, raw: Value) -> ProviderVerdict {
    let obj = extract_json_object(model_text).unwrap_or_else(|| Value::Object(Default::default()));

    let label = obj
        .get("classification")
        .and_then(Value::as_str)
        .unwrap_or(LABEL_SAFE)
        .to_lowercase();

    let confidence = match obj.get("confidence") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(DEFAULT_CONFIDENCE),
        // Models occasionally quote the number
        Some(Value::String(s)) => s.trim().parse().unwrap_or(DEFAULT_CONFIDENCE),
        _ => DEFAULT_CONFIDENCE,
    };

    let reasoning = obj
        .get("reasoning")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    ProviderVerdict {
        label,
        confidence,
        reasoning,
        raw,
    }
}
