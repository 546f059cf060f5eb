use super::LLMClient;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Serialize, Default)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Deserialize)]
struct GeminiCandidatePart {
    #[serde(default)]
    text: String,
}

pub struct GeminiClient {
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    fn api_key(config: &LLMConfig) -> Result<String> {
        config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::LLMError("Missing API key for Gemini".to_string()))
    }

    fn generation_config(config: &LLMConfig) -> GenerationConfig {
        GenerationConfig {
            temperature: config.temperature.map(f64::from),
            max_output_tokens: config.max_tokens,
            ..Default::default()
        }
    }

    async fn send(&self, config: &LLMConfig, body: &GeminiRequest) -> Result<String> {
        let api_key = Self::api_key(config)?;
        let base_url = config.base_url.trim_end_matches('/');
        let url = format!("{}/{}:generateContent", base_url, config.model.trim());

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::LLMError(format!("Request failed: {}", e.without_url())))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLMError(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        let json: GeminiResponse = response
            .json()
            .await
            .map_err(|e| {
                AppError::LLMError(format!("Failed to parse JSON: {}", e.without_url()))
            })?;

        Ok(Self::response_text(json))
    }

    /// Concatenate the text parts of the first candidate
    fn response_text(response: GeminiResponse) -> String {
        response
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for GeminiClient {
    async fn generate_json(
        &self,
        config: &LLMConfig,
        prompt: &str,
        schema: &Value,
    ) -> Result<String> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart::Text {
                    text: prompt.to_string(),
                }],
                role: None,
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(schema.clone()),
                ..Self::generation_config(config)
            }),
        };

        self.send(config, &body).await
    }

    async fn transcribe(
        &self,
        config: &LLMConfig,
        audio_base64: &str,
        mime_type: &str,
        instruction: &str,
    ) -> Result<String> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![
                    GeminiPart::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: audio_base64.to_string(),
                        },
                    },
                    GeminiPart::Text {
                        text: instruction.to_string(),
                    },
                ],
                role: None,
            }],
            generation_config: None,
        };

        self.send(config, &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_request_shape() {
        let config = LLMConfig {
            temperature: Some(0.5),
            ..Default::default()
        };
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart::Text {
                    text: "Labas".to_string(),
                }],
                role: None,
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(serde_json::json!({"type": "OBJECT"})),
                ..GeminiClient::generation_config(&config)
            }),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Labas");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(json["generationConfig"]["temperature"], 0.5);
        assert!(json["generationConfig"].get("maxOutputTokens").is_none());
        assert!(json["contents"][0].get("role").is_none());
    }

    #[test]
    fn test_inline_audio_part_shape() {
        let part = GeminiPart::InlineData {
            inline_data: InlineData {
                mime_type: "audio/webm".to_string(),
                data: "AAAA".to_string(),
            },
        };
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["inlineData"]["mimeType"], "audio/webm");
        assert_eq!(json["inlineData"]["data"], "AAAA");
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(GeminiClient::response_text(response), "{\"a\":1}");

        let empty: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(GeminiClient::response_text(empty), "");
    }

    #[test]
    fn test_missing_api_key() {
        let config = LLMConfig {
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            GeminiClient::api_key(&config),
            Err(AppError::LLMError(_))
        ));
    }

    #[tokio::test]
    async fn test_transport_error_hides_api_key() {
        let config = LLMConfig {
            base_url: "http://127.0.0.1:9/v1beta/models".to_string(),
            api_key: Some("SECRET-KEY-123".to_string()),
            ..Default::default()
        };

        let err = GeminiClient::new()
            .transcribe(&config, "AAAA", "audio/webm", "Transkribuok")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::LLMError(_)));
        assert!(!err.to_string().contains("SECRET-KEY-123"));
    }
}
