// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gemini API client for single-prompt text generation.
//!
//! One request per prompt, no streaming, no retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;

/// Text generation failures, kept distinct so callers can branch on them.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error(
        "GEMINI_API_KEY not found. Please add it to the secrets file or set it as an environment variable."
    )]
    MissingApiKey,

    #[error("request failed: {0}")]
    Request(String),

    #[error("provider returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("model returned an empty response")]
    EmptyResponse,
}

/// Anything that turns one prompt into one block of text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, GenerationError> {
        if config.gemini_api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY not set - plan generation will fail until it is");
        }
        Self::new(
            config.gemini_base_url.clone(),
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            Duration::from_secs(config.gemini_timeout_secs),
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        tracing::info!(
            model = %self.model,
            prompt_chars = prompt.len(),
            "Calling Gemini generateContent"
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| {
                    v.pointer("/error/message")
                        .and_then(|m| m.as_str())
                        .map(str::to_string)
                })
                .unwrap_or(body);
            tracing::warn!(status = status.as_u16(), "Gemini request rejected");
            return Err(GenerationError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Request(format!("invalid response body: {}", e)))?;

        body.text().ok_or(GenerationError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_joins_first_candidate_parts() {
        let body: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"**Day 1:**"},{"text":" oats"}]}},{"content":{"parts":[{"text":"ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(body.text().as_deref(), Some("**Day 1:** oats"));
    }

    #[test]
    fn test_blank_response_is_empty() {
        let body: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#)
                .unwrap();
        assert!(body.text().is_none());

        let blocked: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert!(blocked.text().is_none());
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let client = GeminiClient::new(
            "http://127.0.0.1:9",
            None,
            "gemini-2.5-pro",
            Duration::from_secs(1),
        )
        .unwrap();
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, GenerationError::MissingApiKey));
    }
}
