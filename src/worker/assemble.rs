//! Turns a Slack thread into the ordered, role-tagged content sent to Gemini.

use tracing::{debug, info};

use crate::core::models::{ContentBlock, Part, Role, ThreadMessage};
use crate::errors::RelayError;
use crate::slack::{SlackApi, THREAD_FETCH_LIMIT};
use crate::utils::filters::{sort_by_timestamp, strip_leading_mention};
use crate::utils::mime::{AttachmentKind, classify_mime, resolve_file_mime};

/// Stand-in turn when nothing in the thread survives filtering; the model
/// rejects empty input.
pub const EMPTY_THREAD_PLACEHOLDER: &str = "(no content)";

/// Fetch the thread anchored at `thread_ts` and build its content blocks.
///
/// Attachments are downloaded one at a time in thread order. Any failed
/// download aborts the whole assembly.
///
/// # Errors
///
/// Returns an error if the thread cannot be read or an attachment download fails.
pub async fn build_contents_from_thread(
    slack: &dyn SlackApi,
    channel_id: &str,
    thread_ts: &str,
) -> Result<Vec<ContentBlock>, RelayError> {
    let mut messages = slack
        .fetch_thread(channel_id, thread_ts, THREAD_FETCH_LIMIT)
        .await?;
    sort_by_timestamp(&mut messages);

    let mut contents: Vec<ContentBlock> = Vec::with_capacity(messages.len());
    for msg in &messages {
        let parts = message_parts(slack, msg).await?;
        if parts.is_empty() {
            debug!(ts = %msg.ts, "Skipping message without usable content");
            continue;
        }
        contents.push(ContentBlock {
            role: msg.role(),
            parts,
        });
    }

    if contents.is_empty() {
        contents.push(ContentBlock::text(Role::User, EMPTY_THREAD_PLACEHOLDER));
    }

    info!(
        channel = %channel_id,
        thread_ts = %thread_ts,
        messages = messages.len(),
        blocks = contents.len(),
        "Assembled thread contents"
    );
    Ok(contents)
}

async fn message_parts(slack: &dyn SlackApi, msg: &ThreadMessage) -> Result<Vec<Part>, RelayError> {
    let mut parts: Vec<Part> = Vec::new();

    let text = strip_leading_mention(msg.text.as_deref().unwrap_or(""));
    if !text.is_empty() {
        parts.push(Part::Text(text));
    }

    for file in &msg.files {
        let Some(url) = file.url_private_download.as_deref().filter(|u| !u.is_empty()) else {
            continue;
        };
        let Some(mime_type) = resolve_file_mime(file) else {
            debug!(ts = %msg.ts, "Dropping attachment with unknown type");
            continue;
        };

        match classify_mime(&mime_type) {
            AttachmentKind::Text => {
                let bytes = slack.download_file(url).await?;
                parts.push(Part::Text(String::from_utf8_lossy(&bytes).into_owned()));
            }
            AttachmentKind::Binary => {
                let data = slack.download_file(url).await?;
                parts.push(Part::Bytes { mime_type, data });
            }
            AttachmentKind::Unsupported => {
                debug!(ts = %msg.ts, mime = %mime_type, "Dropping unsupported attachment");
            }
        }
    }

    Ok(parts)
}
