use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Instant;
use tracing::debug;

use crate::{CritiqueRequest, CritiqueService, ServiceError, ServiceResponse};

/// Public Gemini REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini REST implementation of the critique service
pub struct GeminiService {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiService {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Build the service from an API key stored in the given environment variable
    pub fn from_env(var: &str, base_url: Option<String>) -> Result<Self, ServiceError> {
        let api_key = std::env::var(var)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ServiceError::MissingApiKey(var.to_string()))?;

        Ok(Self::with_base_url(
            api_key,
            base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        ))
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }

    fn body(request: &CritiqueRequest) -> serde_json::Value {
        json!({
            "systemInstruction": {
                "parts": [
                    {"text": request.config.system_instruction}
                ]
            },
            "contents": [
                {
                    "role": "user",
                    "parts": request.contents.parts,
                }
            ],
            "generationConfig": {
                "temperature": request.config.temperature,
                "responseMimeType": request.config.response_mime_type,
                "responseSchema": request.config.response_schema,
            }
        })
    }
}

#[async_trait]
impl CritiqueService for GeminiService {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn generate(&self, request: &CritiqueRequest) -> Result<ServiceResponse, ServiceError> {
        let start = Instant::now();

        debug!(
            model = %request.model,
            temperature = request.config.temperature,
            media_parts = request.media_count(),
            "Calling Gemini generateContent"
        );

        let response = self
            .http_client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::body(request))
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;

        let text = parsed
            .candidates
            .unwrap_or_default()
            .into_iter()
            .take(1)
            .flat_map(|candidate| {
                candidate
                    .content
                    .and_then(|content| content.parts)
                    .unwrap_or_default()
            })
            .filter_map(|part| part.text)
            .collect::<String>();

        debug!(
            response_len = text.len(),
            duration_ms = start.elapsed().as_millis(),
            "Gemini call completed"
        );

        if text.trim().is_empty() {
            return Err(ServiceError::EmptyResponse);
        }

        Ok(ServiceResponse { text })
    }
}
