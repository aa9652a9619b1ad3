use axum::http::HeaderMap;
use serde_json::Value;

/// Slack sets this on every redelivery of an event it thinks we missed.
pub const RETRY_NUM_HEADER: &str = "X-Slack-Retry-Num";
pub const SIGNATURE_HEADER: &str = "X-Slack-Signature";
pub const TIMESTAMP_HEADER: &str = "X-Slack-Request-Timestamp";

pub fn get_header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Decode a request body as JSON; anything else decodes to `Value::Null`.
#[must_use]
pub fn decode_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

/// Workspace that sent the payload: `team_id`, else `team.id`, else the first
/// authorization's `team_id`.
pub fn team_id_from_payload(payload: &Value) -> Option<&str> {
    v_str(payload, &["team_id"])
        .or_else(|| v_str(payload, &["team", "id"]))
        .or_else(|| {
            payload
                .get("authorizations")
                .and_then(Value::as_array)
                .and_then(|a| a.first())
                .and_then(|a| v_str(a, &["team_id"]))
        })
}
