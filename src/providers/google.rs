use crate::config::AppConfig;
use crate::error::HealthError;
use crate::providers::{ContentPart, LlmProvider};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiProvider {
    /// Create a new Google Gemini provider from configuration
    pub fn new(config: &AppConfig) -> Result<Self, HealthError> {
        let api_key = config.resolve_api_key()?;
        Ok(Self::with_base_url(api_key, config.base_url.clone(), config.model.clone())
            .with_generation_config(config.temperature, config.max_tokens))
    }

    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        GeminiProvider {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_generation_config(mut self, temperature: Option<f32>, max_tokens: Option<u32>) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    fn build_request(&self, parts: &[ContentPart]) -> GeminiRequest {
        let parts = parts
            .iter()
            .map(|part| match part {
                ContentPart::Text(text) => Part::Text { text: text.clone() },
                ContentPart::Image(image) => Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type().to_string(),
                        data: STANDARD.encode(image.data()),
                    },
                },
            })
            .collect();

        let generation_config = if self.temperature.is_some() || self.max_tokens.is_some() {
            Some(GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_tokens,
            })
        } else {
            None
        };

        GeminiRequest {
            contents: vec![Content { parts }],
            generation_config,
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, parts: &[ContentPart]) -> Result<String, HealthError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&self.build_request(parts))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Google Gemini response ({}): {}", status, body);

        // Proxies and front ends answer failures with HTML, keep their status
        let response_body: Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(_) if !status.is_success() => {
                return Err(HealthError::Api {
                    status: status.as_u16(),
                    message: body.trim().to_string(),
                });
            }
            Err(e) => {
                return Err(HealthError::MalformedResponse(format!(
                    "Gemini response is not JSON: {}",
                    e
                )));
            }
        };

        // Check for API error response
        if let Some(error) = response_body.get("error") {
            let code = error["code"].as_u64().unwrap_or(status.as_u16() as u64);
            let message = error["message"].as_str().unwrap_or("Unknown error");
            return Err(HealthError::Api {
                status: code as u16,
                message: message.to_string(),
            });
        }

        if !status.is_success() {
            return Err(HealthError::Api {
                status: status.as_u16(),
                message: response_body.to_string(),
            });
        }

        let parsed: GeminiResponse = serde_json::from_value(response_body)
            .map_err(|e| HealthError::MalformedResponse(e.to_string()))?;

        let candidate = parsed.candidates.into_iter().next().ok_or_else(|| {
            HealthError::MalformedResponse("No candidates in Gemini response".to_string())
        })?;

        // A candidate stopped by safety filters carries no text
        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        Ok(text)
    }
}
