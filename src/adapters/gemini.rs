use crate::config::toml_config::ModelConfig;
use crate::domain::model::{ModelRequest, ModelResponse};
use crate::domain::ports::TextGenerator;
use crate::utils::error::{Result, WordWolfError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Calls the Gemini `generateContent` REST endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfigBody,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<PartOut<'a>>,
}

#[derive(Debug, Serialize)]
struct PartOut<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfigBody {
    response_mime_type: &'static str,
    temperature: f32,
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartIn>,
}

#[derive(Debug, Deserialize)]
struct PartIn {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key()?.to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![PartOut {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfigBody {
                response_mime_type: request.response_format.mime_type(),
                temperature: request.temperature,
                thinking_config: ThinkingConfig {
                    thinking_budget: request.reasoning_budget,
                },
            },
        };

        let url = self.endpoint(&request.model);
        tracing::debug!("Making model request to: {}", url);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Model response status: {}", status);
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(WordWolfError::ExternalService {
                message: format!("HTTP {}: {}", status, detail.trim()),
            });
        }

        let payload: GenerateContentResponse = response.json().await?;
        let Some(content) = payload.candidates.into_iter().next().and_then(|c| c.content) else {
            return Err(WordWolfError::ExternalService {
                message: "response contained no candidates".to_string(),
            });
        };

        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        Ok(ModelResponse { text })
    }
}
