use serde::{Deserialize, Serialize};

/// One message of a Slack thread, as returned by `conversations.replies`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ThreadMessage {
    pub ts: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub files: Vec<ThreadFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ThreadFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mimetype: Option<String>,
    #[serde(default)]
    pub url_private_download: Option<String>,
}

impl ThreadMessage {
    /// Messages posted by an app or integration are the model's turns.
    #[must_use]
    pub fn role(&self) -> Role {
        let is_bot = self.bot_id.as_deref().is_some_and(|id| !id.is_empty())
            || self.subtype.as_deref() == Some("bot_message");
        if is_bot { Role::Model } else { Role::User }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    Bytes { mime_type: String, data: Vec<u8> },
}

/// One conversational turn sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl ContentBlock {
    #[must_use]
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part::Text(text.into())],
        }
    }
}

/// The `app_mention` fields the relay needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MentionEvent {
    pub channel: String,
    pub ts: String,
    #[serde(default)]
    pub thread_ts: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
}

impl MentionEvent {
    /// Replies go to the existing thread, or start one under the mention.
    #[must_use]
    pub fn thread_anchor(&self) -> &str {
        self.thread_ts
            .as_deref()
            .filter(|ts| !ts.is_empty())
            .unwrap_or(&self.ts)
    }
}
