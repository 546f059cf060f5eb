// ============================================================
// AI INSIGHTS
// ============================================================
// Survey insights, reflection suggestions and dictation via the LLM client

mod prompts;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::domain::error::{AppError, Result};
use crate::domain::insights::{AiInsights, ReflectionSuggestions};
use crate::domain::llm_config::LLMConfig;
use crate::domain::reflection::ReflectionData;
use crate::domain::survey::SurveyAnalysis;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::{clean_llm_response, extract_json_payload};

pub struct InsightsUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
}

impl InsightsUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self { llm_client }
    }

    /// Never fails: any error yields `AiInsights::fallback()`
    pub async fn generate_insights(
        &self,
        config: &LLMConfig,
        analysis: &SurveyAnalysis,
    ) -> AiInsights {
        match self.request_insights(config, analysis).await {
            Ok(insights) => {
                info!(
                    themes = insights.themes.len(),
                    sentiment = insights.effective_sentiment(),
                    "Generated survey insights"
                );
                insights
            }
            Err(e) => {
                warn!(error = %e, "Insight generation failed, using fallback");
                AiInsights::fallback()
            }
        }
    }

    async fn request_insights(
        &self,
        config: &LLMConfig,
        analysis: &SurveyAnalysis,
    ) -> Result<AiInsights> {
        let summaries_json = serde_json::to_string(&analysis.summaries)?;
        let prompt = prompts::insights_prompt(&summaries_json, &analysis.feedback);

        self.request_json(config, &prompt, &prompts::insights_schema())
            .await
    }

    /// Never fails: any error yields empty suggestion lists
    pub async fn generate_suggestions(
        &self,
        config: &LLMConfig,
        reflection: &ReflectionData,
        insights: Option<&AiInsights>,
    ) -> ReflectionSuggestions {
        let themes_json = insights
            .and_then(|i| serde_json::to_string(&i.themes).ok())
            .unwrap_or_else(|| "[]".to_string());
        let prompt = prompts::suggestions_prompt(reflection, insights, &themes_json);

        match self
            .request_json::<ReflectionSuggestions>(config, &prompt, &prompts::suggestions_schema())
            .await
        {
            Ok(suggestions) => suggestions,
            Err(e) => {
                warn!(error = %e, "Suggestion generation failed");
                ReflectionSuggestions::default()
            }
        }
    }

    /// Transcribe dictated audio; errors are returned to the caller
    pub async fn transcribe(
        &self,
        config: &LLMConfig,
        audio_base64: &str,
        mime_type: &str,
    ) -> Result<String> {
        if audio_base64.trim().is_empty() {
            return Err(AppError::ValidationError("Audio data is empty".to_string()));
        }

        let raw = self
            .llm_client
            .transcribe(config, audio_base64, mime_type, prompts::TRANSCRIPTION_INSTRUCTION)
            .await?;

        Ok(clean_llm_response(&raw))
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        config: &LLMConfig,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<T> {
        let raw = self.llm_client.generate_json(config, prompt, schema).await?;
        let payload = extract_json_payload(&raw);
        let payload = if payload.is_empty() { "{}" } else { payload.as_str() };

        serde_json::from_str(payload)
            .map_err(|e| AppError::ParseError(format!("Invalid model JSON: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::survey::{Category, QuestionSummary};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    struct StubClient {
        reply: std::result::Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubClient {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err("quota exceeded".to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn answer(&self) -> Result<String> {
            self.reply.clone().map_err(AppError::LLMError)
        }
    }

    #[async_trait]
    impl LLMClient for StubClient {
        async fn generate_json(
            &self,
            _config: &LLMConfig,
            prompt: &str,
            _schema: &Value,
        ) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.answer()
        }

        async fn transcribe(
            &self,
            _config: &LLMConfig,
            _audio_base64: &str,
            _mime_type: &str,
            instruction: &str,
        ) -> Result<String> {
            self.prompts.lock().unwrap().push(instruction.to_string());
            self.answer()
        }
    }

    fn analysis() -> SurveyAnalysis {
        SurveyAnalysis {
            summaries: vec![QuestionSummary {
                question: "Mokytis yra įdomu".to_string(),
                counts: BTreeMap::from([("Visiškai sutinku".to_string(), 2)]),
                total: 2,
                average_score: 5.0,
                category: Category::Engagement,
                is_reverse: false,
            }],
            feedback: vec!["Labai patinka eksperimentai".to_string()],
            row_count: 2,
        }
    }

    #[tokio::test]
    async fn test_insights_parsed_from_fenced_json() {
        let client = StubClient::replying(
            "```json\n{\"strengths\":\"Aiškus dėstymas\",\"improvements\":\"Namų darbai\",\"insights\":\"\",\"themes\":[{\"label\":\"Saugumas\",\"description\":\"Jaučiasi saugiai\",\"sentiment\":\"pozityvi\"}],\"sentimentScore\":72}\n```",
        );
        let use_case = InsightsUseCase::new(client.clone());

        let insights = use_case
            .generate_insights(&LLMConfig::default(), &analysis())
            .await;

        assert_eq!(insights.strengths, "Aiškus dėstymas");
        assert_eq!(insights.themes.len(), 1);
        assert_eq!(insights.sentiment_score, 72.0);

        let prompts = client.prompts.lock().unwrap();
        assert!(prompts[0].contains("Mokytis yra įdomu"));
        assert!(prompts[0].contains("Labai patinka eksperimentai"));
    }

    #[tokio::test]
    async fn test_insights_fallback_on_error_and_bad_json() {
        let failing = InsightsUseCase::new(StubClient::failing());
        assert_eq!(
            failing
                .generate_insights(&LLMConfig::default(), &analysis())
                .await,
            AiInsights::fallback()
        );

        let garbage = InsightsUseCase::new(StubClient::replying("ne JSON"));
        assert_eq!(
            garbage
                .generate_insights(&LLMConfig::default(), &analysis())
                .await,
            AiInsights::fallback()
        );
    }

    #[tokio::test]
    async fn test_missing_fields_default() {
        let use_case = InsightsUseCase::new(StubClient::replying(""));
        let insights = use_case
            .generate_insights(&LLMConfig::default(), &analysis())
            .await;

        assert_eq!(insights.strengths, "");
        assert_eq!(insights.sentiment_score, 50.0);
    }

    #[tokio::test]
    async fn test_suggestions_fallback_is_empty() {
        let use_case = InsightsUseCase::new(StubClient::failing());
        let suggestions = use_case
            .generate_suggestions(&LLMConfig::default(), &ReflectionData::default(), None)
            .await;
        assert!(suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_suggestions_parsed() {
        let use_case = InsightsUseCase::new(StubClient::replying(
            r#"{"observationSuggestions":["Pažvelk į temas"],"actionSuggestions":["Pradėk nuo grupinių darbų"]}"#,
        ));
        let insights = AiInsights::fallback();
        let suggestions = use_case
            .generate_suggestions(&LLMConfig::default(), &ReflectionData::default(), Some(&insights))
            .await;

        assert_eq!(suggestions.observation_suggestions, vec!["Pažvelk į temas"]);
        assert!(suggestions.emotion_suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_transcribe_trims_and_propagates_errors() {
        let client = StubClient::replying("  Šiandien pamoka buvo gera.\n");
        let use_case = InsightsUseCase::new(client.clone());
        let text = use_case
            .transcribe(&LLMConfig::default(), "AAAA", "audio/webm")
            .await
            .unwrap();
        assert_eq!(text, "Šiandien pamoka buvo gera.");
        assert!(client.prompts.lock().unwrap()[0].contains("lietuvių kalba"));

        let failing = InsightsUseCase::new(StubClient::failing());
        let err = failing
            .transcribe(&LLMConfig::default(), "AAAA", "audio/webm")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::LLMError(_)));
    }

    #[tokio::test]
    async fn test_transcribe_rejects_empty_audio() {
        let use_case = InsightsUseCase::new(StubClient::replying("x"));
        let err = use_case
            .transcribe(&LLMConfig::default(), " ", "audio/webm")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
