//! Slack API client module
//!
//! Encapsulates the Slack Web API calls the relay makes: reading a thread,
//! downloading its private files, and posting the reply.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::{SlackApiToken, SlackApiTokenValue};
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::models::ThreadMessage;
use crate::errors::RelayError;

/// Upper bound on messages read from one thread.
pub const THREAD_FETCH_LIMIT: usize = 50;

/// Largest attachment inlined into a Gemini request. Vertex caps the whole
/// request at 20 MB and base64 grows the payload by a third.
pub const MAX_ATTACHMENT_BYTES: usize = 15 * 1024 * 1024;

/// Per-request timeout for Slack calls and attachment downloads.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

// Build the Slack client connector safely without panicking.
// If connector construction fails, store None and surface a RelayError at call sites.
static SLACK_CLIENT: std::sync::LazyLock<Option<SlackHyperClient>> =
    std::sync::LazyLock::new(|| match SlackClientHyperConnector::new() {
        Ok(connector) => Some(SlackHyperClient::new(connector)),
        Err(e) => {
            warn!("Failed to create Slack HTTP connector: {}", e);
            None
        }
    });

static HTTP_CLIENT: std::sync::LazyLock<Client> = std::sync::LazyLock::new(|| {
    Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// The Slack operations the worker depends on.
#[async_trait]
pub trait SlackApi: Send + Sync {
    /// Read up to `limit` messages of the thread rooted at `thread_ts`.
    async fn fetch_thread(
        &self,
        channel_id: &str,
        thread_ts: &str,
        limit: usize,
    ) -> Result<Vec<ThreadMessage>, RelayError>;

    /// Download a private file with the bot credential.
    async fn download_file(&self, url: &str) -> Result<Vec<u8>, RelayError>;

    /// Post a reply with a text fallback and Block Kit blocks into a thread.
    async fn post_thread_reply(
        &self,
        channel_id: &str,
        thread_ts: &str,
        text_fallback: &str,
        blocks: &Value,
    ) -> Result<(), RelayError>;
}

#[derive(Debug, Deserialize)]
struct RepliesResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    messages: Vec<ThreadMessage>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: Option<String>,
}

/// Slack Web API client authenticated with the bot token
pub struct SlackClient {
    token: SlackApiToken,
    api_base: String,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String, api_base: impl Into<String>) -> Self {
        Self {
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn token(&self) -> &SlackApiToken {
        &self.token
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.api_base)
    }

    /// Resolve the bot's own user id via `auth.test`; used as a startup token check.
    ///
    /// # Errors
    ///
    /// Returns an error if the connector is unavailable or Slack rejects the token.
    pub async fn get_bot_user_id(&self) -> Result<String, RelayError> {
        let session = SLACK_CLIENT
            .as_ref()
            .ok_or_else(|| RelayError::ApiError("Slack HTTP connector not initialized".to_string()))?
            .open_session(&self.token);

        let test_resp = session.auth_test().await?;
        Ok(test_resp.user_id.0)
    }

    /// Download a private file, refusing anything larger than `max_bytes`.
    ///
    /// The declared `Content-Length` is checked first; the running total is
    /// checked again while streaming since Slack does not always send one.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the request fails, Slack responds non-2xx, or
    /// the file exceeds `max_bytes`.
    pub async fn download_bytes(&self, url: &str, max_bytes: usize) -> Result<Vec<u8>, RelayError> {
        let resp = HTTP_CLIENT
            .get(url)
            .bearer_auth(&self.token.token_value.0)
            .send()
            .await
            .map_err(|e| RelayError::DownloadError(format!("{url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RelayError::DownloadError(format!("{url}: HTTP {status}")));
        }

        if let Some(len) = resp.content_length()
            && len > u64::try_from(max_bytes).unwrap_or(u64::MAX)
        {
            return Err(RelayError::DownloadError(format!(
                "{url}: file too large to inline ({len}B > {max_bytes}B)"
            )));
        }

        let mut out: Vec<u8> = Vec::new();
        let mut stream = resp.bytes_stream();
        while let Some(item) = stream.next().await {
            let chunk = item.map_err(|e| RelayError::DownloadError(format!("{url}: {e}")))?;
            if out.len().saturating_add(chunk.len()) > max_bytes {
                return Err(RelayError::DownloadError(format!(
                    "{url}: file too large to inline (exceeded {max_bytes}B cap)"
                )));
            }
            out.extend_from_slice(&chunk);
        }

        Ok(out)
    }

    async fn fetch_replies_page(
        &self,
        channel_id: &str,
        thread_ts: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<RepliesResponse, RelayError> {
        let limit = limit.to_string();
        let mut query: Vec<(&str, &str)> = vec![
            ("channel", channel_id),
            ("ts", thread_ts),
            ("limit", limit.as_str()),
        ];
        if let Some(c) = cursor {
            query.push(("cursor", c));
        }

        let resp = HTTP_CLIENT
            .get(self.method_url("conversations.replies"))
            .bearer_auth(&self.token.token_value.0)
            .query(&query)
            .send()
            .await
            .map_err(|e| RelayError::HttpError(format!("conversations.replies HTTP: {e}")))?;

        if !resp.status().is_success() {
            return Err(RelayError::ApiError(format!(
                "conversations.replies HTTP {}",
                resp.status()
            )));
        }

        let body: RepliesResponse = resp
            .json()
            .await
            .map_err(|e| RelayError::ParseError(format!("conversations.replies parse: {e}")))?;

        if !body.ok {
            return Err(RelayError::ApiError(format!(
                "conversations.replies error: {}",
                body.error.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(body)
    }
}

#[async_trait]
impl SlackApi for SlackClient {
    async fn fetch_thread(
        &self,
        channel_id: &str,
        thread_ts: &str,
        limit: usize,
    ) -> Result<Vec<ThreadMessage>, RelayError> {
        let mut messages: Vec<ThreadMessage> = Vec::new();
        let mut cursor: Option<String> = None;

        while messages.len() < limit {
            let page = self
                .fetch_replies_page(
                    channel_id,
                    thread_ts,
                    limit - messages.len(),
                    cursor.as_deref(),
                )
                .await?;

            messages.extend(page.messages);

            cursor = page
                .response_metadata
                .and_then(|m| m.next_cursor)
                .filter(|c| !c.is_empty());
            if !page.has_more || cursor.is_none() {
                break;
            }
        }

        messages.truncate(limit);
        debug!(
            channel = %channel_id,
            thread_ts = %thread_ts,
            count = messages.len(),
            "Fetched thread replies"
        );
        Ok(messages)
    }

    async fn download_file(&self, url: &str) -> Result<Vec<u8>, RelayError> {
        self.download_bytes(url, MAX_ATTACHMENT_BYTES).await
    }

    async fn post_thread_reply(
        &self,
        channel_id: &str,
        thread_ts: &str,
        text_fallback: &str,
        blocks: &Value,
    ) -> Result<(), RelayError> {
        let payload = json!({
            "channel": channel_id,
            "thread_ts": thread_ts,
            "text": text_fallback,
            "blocks": blocks,
        });

        let resp = HTTP_CLIENT
            .post(self.method_url("chat.postMessage"))
            .bearer_auth(&self.token.token_value.0)
            .json(&payload)
            .send()
            .await
            .map_err(|e| RelayError::HttpError(format!("Failed to post message: {e}")))?;

        if !resp.status().is_success() {
            return Err(RelayError::ApiError(format!(
                "chat.postMessage HTTP {}",
                resp.status()
            )));
        }

        let body: Value = resp.json().await.map_err(|e| {
            RelayError::ParseError(format!("chat.postMessage JSON parse error: {e}"))
        })?;

        if !body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
            return Err(RelayError::ApiError(format!(
                "chat.postMessage error: {}",
                body.get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
            )));
        }

        Ok(())
    }
}
