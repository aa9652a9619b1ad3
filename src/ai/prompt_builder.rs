//! Request payloads for Gemini `generateContent`.

use base64::{Engine as _, engine::general_purpose};
use serde_json::{Value, json};

use crate::core::models::{ContentBlock, Part};

/// Keeps replies in the subset of markup Slack renders in `mrkdwn` sections.
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant replying inside a Slack thread. \
Format every answer with Slack mrkdwn only: \
*bold* uses single asterisks, \
_italic_ uses underscores, \
links are written as <https://example.com|label>, \
`inline code` uses single backticks, \
multi-line code goes in ``` fenced blocks ```, \
and quotes start the line with > . \
Do not use Markdown headings (#), double-asterisk bold, or [label](url) links.";

/// Serialize one content block into Gemini's `Content` shape.
#[must_use]
pub fn content_to_json(block: &ContentBlock) -> Value {
    let parts: Vec<Value> = block
        .parts
        .iter()
        .map(|part| match part {
            Part::Text(text) => json!({ "text": text }),
            Part::Bytes { mime_type, data } => json!({
                "inlineData": {
                    "mimeType": mime_type,
                    "data": general_purpose::STANDARD.encode(data),
                }
            }),
        })
        .collect();

    json!({
        "role": block.role.as_str(),
        "parts": parts,
    })
}

/// Full request body: contents, the fixed system instruction, and the two
/// server-side tools (URL context and Google Search).
#[must_use]
pub fn build_generate_request(contents: &[ContentBlock]) -> Value {
    json!({
        "contents": contents.iter().map(content_to_json).collect::<Vec<_>>(),
        "systemInstruction": {
            "parts": [{ "text": SYSTEM_INSTRUCTION }]
        },
        "tools": [
            { "urlContext": {} },
            { "googleSearch": {} }
        ],
    })
}
