//! Handler for Slack Events API callbacks.
//!
//! Only `app_mention` starts work; every other event is acknowledged and dropped.

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;
use tracing::{info, warn};

use super::handler::AppState;
use super::helpers::{err_response, ok_empty};
use super::parsing::v_str;
use crate::core::models::MentionEvent;
use crate::worker::spawn_mention_reply;

/// Route a signature-verified event payload.
///
/// Mentions are acknowledged immediately; the reply runs on a spawned task.
pub fn handle_event_callback(state: &AppState, payload: &Value) -> Response {
    if !payload.is_object() {
        return err_response(StatusCode::BAD_REQUEST, "Invalid JSON body");
    }

    if v_str(payload, &["type"]) != Some("event_callback") {
        return ok_empty();
    }

    let Some(event) = payload.get("event") else {
        return ok_empty();
    };

    let event_type = v_str(event, &["type"]).unwrap_or("");
    info!(event_type = %event_type, "Processing event callback");

    match event_type {
        "app_mention" => handle_app_mention(state, event),
        _ => ok_empty(),
    }
}

fn handle_app_mention(state: &AppState, event: &Value) -> Response {
    let mention: MentionEvent = match serde_json::from_value(event.clone()) {
        Ok(m) => m,
        Err(e) => {
            warn!("Malformed app_mention event: {}", e);
            return err_response(StatusCode::BAD_REQUEST, &format!("Parse Error: {e}"));
        }
    };

    // Ignore bot-authored mentions to avoid reply loops
    if mention.bot_id.is_some() {
        return ok_empty();
    }

    spawn_mention_reply(state.services.clone(), mention);
    ok_empty()
}
