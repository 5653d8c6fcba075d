pub mod gemini_client;
pub mod openai_client;
pub mod provider;

pub use gemini_client::GeminiClient;
pub use openai_client::OpenAiClient;
pub use provider::{ModerationProvider, ProviderError, ProviderVerdict};
