//! Block Kit payloads for replies posted into a thread.

use serde_json::{Value, json};

/// Slack's limit for the text of a single `section` block.
pub const SECTION_TEXT_LIMIT: usize = 3000;

/// Build the single `mrkdwn` section block that carries a reply.
///
/// Text longer than a section allows is cut on a char boundary and marked
/// with an ellipsis; the message's plain-text fallback still carries all of it.
///
/// # Examples
///
/// ```
/// use slack_gemini_relay::slack::response_builder::build_reply_blocks;
///
/// let blocks = build_reply_blocks("*hello*");
/// assert_eq!(blocks[0]["type"], "section");
/// assert_eq!(blocks[0]["text"]["type"], "mrkdwn");
/// ```
#[must_use]
pub fn build_reply_blocks(text: &str) -> Value {
    json!([
        {
            "type": "section",
            "text": {
                "type": "mrkdwn",
                "text": truncate_for_section(text),
            }
        }
    ])
}

fn truncate_for_section(text: &str) -> String {
    if text.chars().count() <= SECTION_TEXT_LIMIT {
        return text.to_string();
    }
    let mut out: String = text.chars().take(SECTION_TEXT_LIMIT - 1).collect();
    out.push('…');
    out
}
