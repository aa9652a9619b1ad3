use tracing::info;

use crate::errors::RelayError;
use crate::slack::SlackApi;
use crate::slack::response_builder::build_reply_blocks;

/// Post `text` into the thread as a plain-text fallback plus one mrkdwn section.
///
/// # Errors
///
/// Returns an error if Slack rejects the message.
pub async fn post_reply(
    slack: &dyn SlackApi,
    channel_id: &str,
    thread_ts: &str,
    text: &str,
) -> Result<(), RelayError> {
    let blocks = build_reply_blocks(text);
    slack
        .post_thread_reply(channel_id, thread_ts, text, &blocks)
        .await?;

    info!(
        channel = %channel_id,
        thread_ts = %thread_ts,
        chars = text.chars().count(),
        "Posted reply"
    );
    Ok(())
}
