//! Gemini (Vertex AI) API client module
//!
//! Sends one `generateContent` request per mention and extracts the reply text.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::info;

use super::auth::Credentials;
use super::prompt_builder::build_generate_request;
use crate::core::config::AppConfig;
use crate::core::models::ContentBlock;
use crate::errors::RelayError;

/// Produces a reply for an assembled conversation.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, contents: &[ContentBlock]) -> Result<String, RelayError>;
}

/// Vertex AI client for a single publisher model.
pub struct GeminiClient {
    api_base: String,
    project: String,
    location: String,
    model_name: String,
    credentials: Credentials,
    http: Client,
}

impl GeminiClient {
    #[must_use]
    pub fn new(
        api_base: impl Into<String>,
        project: impl Into<String>,
        location: impl Into<String>,
        model_name: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            project: project.into(),
            location: location.into(),
            model_name: model_name.into(),
            credentials,
            // No request timeout: a slow generation only holds up its own reply.
            http: Client::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.vertex_api_base.clone(),
            config.google_project.clone(),
            config.google_location.clone(),
            config.model_name.clone(),
            Credentials::from_optional_token(config.google_access_token.clone()),
        )
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    #[must_use]
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.api_base, self.project, self.location, self.model_name
        )
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate(&self, contents: &[ContentBlock]) -> Result<String, RelayError> {
        let request_body = build_generate_request(contents);

        #[cfg(feature = "debug-logs")]
        tracing::debug!("Using Gemini request:\n{}", request_body);

        info!(
            model = %self.model_name,
            turns = contents.len(),
            "Calling Gemini generateContent"
        );

        let token = self.credentials.access_token(&self.http).await?;

        let response = self
            .http
            .post(self.endpoint_url())
            .bearer_auth(token)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| RelayError::GeminiError(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(RelayError::GeminiError(format!(
                "status {status}: {}",
                api_error_message(&error_text)
            )));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| RelayError::GeminiError(format!("Failed to parse response: {e}")))?;

        extract_response_text(&response_json)
    }
}

/// Pull `error.message` out of a Google API error body, else return it whole.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(ToString::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

/// Concatenate the text parts of the first candidate, skipping thought parts.
///
/// # Errors
///
/// Returns an error when the prompt was blocked or no candidate carries text.
pub fn extract_response_text(response_json: &Value) -> Result<String, RelayError> {
    let first_candidate = response_json
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|c| c.first());

    let Some(candidate) = first_candidate else {
        let reason = response_json
            .get("promptFeedback")
            .and_then(|f| f.get("blockReason"))
            .and_then(Value::as_str);
        return Err(match reason {
            Some(r) => RelayError::GeminiError(format!("prompt blocked: {r}")),
            None => RelayError::GeminiError("No candidates in response".to_string()),
        });
    };

    let text: String = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter(|p| !p.get("thought").and_then(Value::as_bool).unwrap_or(false))
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        let finish = candidate
            .get("finishReason")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        return Err(RelayError::GeminiError(format!(
            "No text in response (finishReason: {finish})"
        )));
    }

    Ok(text)
}
