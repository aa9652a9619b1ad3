#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use slack_gemini_relay::RelayError;
use slack_gemini_relay::ai::ContentGenerator;
use slack_gemini_relay::core::models::{ContentBlock, ThreadFile, ThreadMessage};
use slack_gemini_relay::slack::SlackApi;
use slack_gemini_relay::worker::Services;

#[derive(Debug, Clone, PartialEq)]
pub struct PostedReply {
    pub channel_id: String,
    pub thread_ts: String,
    pub text: String,
    pub blocks: Value,
}

/// In-memory Slack: serves a fixed thread and records every post.
#[derive(Default)]
pub struct FakeSlack {
    pub messages: Vec<ThreadMessage>,
    pub files: HashMap<String, Result<Vec<u8>, String>>,
    pub fetch_error: Option<String>,
    pub fetches: Mutex<Vec<(String, String, usize)>>,
    pub posts: Mutex<Vec<PostedReply>>,
}

impl FakeSlack {
    pub fn with_messages(messages: Vec<ThreadMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    pub fn with_file(mut self, url: &str, bytes: &[u8]) -> Self {
        self.files.insert(url.to_string(), Ok(bytes.to_vec()));
        self
    }

    pub fn with_failing_file(mut self, url: &str, reason: &str) -> Self {
        self.files.insert(url.to_string(), Err(reason.to_string()));
        self
    }

    pub fn posts(&self) -> Vec<PostedReply> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl SlackApi for FakeSlack {
    async fn fetch_thread(
        &self,
        channel_id: &str,
        thread_ts: &str,
        limit: usize,
    ) -> Result<Vec<ThreadMessage>, RelayError> {
        self.fetches
            .lock()
            .unwrap()
            .push((channel_id.to_string(), thread_ts.to_string(), limit));
        if let Some(reason) = &self.fetch_error {
            return Err(RelayError::ApiError(reason.clone()));
        }
        Ok(self.messages.clone())
    }

    async fn download_file(&self, url: &str) -> Result<Vec<u8>, RelayError> {
        match self.files.get(url) {
            Some(Ok(bytes)) => Ok(bytes.clone()),
            Some(Err(reason)) => Err(RelayError::DownloadError(reason.clone())),
            None => Err(RelayError::DownloadError(format!("404 Not Found: {url}"))),
        }
    }

    async fn post_thread_reply(
        &self,
        channel_id: &str,
        thread_ts: &str,
        text_fallback: &str,
        blocks: &Value,
    ) -> Result<(), RelayError> {
        self.posts.lock().unwrap().push(PostedReply {
            channel_id: channel_id.to_string(),
            thread_ts: thread_ts.to_string(),
            text: text_fallback.to_string(),
            blocks: blocks.clone(),
        });
        Ok(())
    }
}

/// Scripted model: returns a fixed answer or error and records its input.
pub struct FakeGenerator {
    pub outcome: Result<String, String>,
    pub calls: Mutex<Vec<Vec<ContentBlock>>>,
}

impl FakeGenerator {
    pub fn answering(text: &str) -> Self {
        Self {
            outcome: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: Err(reason.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ContentGenerator for FakeGenerator {
    async fn generate(&self, contents: &[ContentBlock]) -> Result<String, RelayError> {
        self.calls.lock().unwrap().push(contents.to_vec());
        self.outcome.clone().map_err(RelayError::GeminiError)
    }
}

pub fn services(slack: &Arc<FakeSlack>, generator: &Arc<FakeGenerator>) -> Services {
    Services {
        slack: Arc::clone(slack) as Arc<dyn SlackApi>,
        generator: Arc::clone(generator) as Arc<dyn ContentGenerator>,
    }
}

pub fn user_message(ts: &str, text: &str) -> ThreadMessage {
    ThreadMessage {
        ts: ts.to_string(),
        text: Some(text.to_string()),
        ..Default::default()
    }
}

pub fn bot_message(ts: &str, text: &str) -> ThreadMessage {
    ThreadMessage {
        ts: ts.to_string(),
        text: Some(text.to_string()),
        bot_id: Some("B0BOT".to_string()),
        ..Default::default()
    }
}

pub fn attachment(name: &str, mimetype: Option<&str>, url: &str) -> ThreadFile {
    ThreadFile {
        name: Some(name.to_string()),
        mimetype: mimetype.map(ToString::to_string),
        url_private_download: Some(url.to_string()),
    }
}
