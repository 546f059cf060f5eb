pub mod gemini;

use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use async_trait::async_trait;
use serde_json::Value;

pub use gemini::GeminiClient;

#[async_trait]
pub trait LLMClient {
    /// Ask for a JSON answer constrained by `schema`; returns the raw text
    async fn generate_json(&self, config: &LLMConfig, prompt: &str, schema: &Value)
        -> Result<String>;

    /// Transcribe base64-encoded audio into text
    async fn transcribe(
        &self,
        config: &LLMConfig,
        audio_base64: &str,
        mime_type: &str,
        instruction: &str,
    ) -> Result<String>;
}
