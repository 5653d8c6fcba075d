pub mod constants;
pub mod fingerprint;
pub mod llm;
