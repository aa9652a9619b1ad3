//! HTTP entrypoint - the webhook gatekeeper plus a health route.
//!
//! `POST /slack/events` is checked in a fixed order:
//! - retry suppression (any `X-Slack-Retry-Num` header is answered with 404)
//! - URL verification challenge (echoed before any other check)
//! - workspace allow-list
//! - signature verification and event dispatch (delegated to `event_handler`)

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::{event_handler, helpers, parsing, signature};
use crate::core::config::AppConfig;
use crate::worker::Services;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Services,
}

/// What the gatekeeper decided for one inbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// Slack redelivery; answered with 404 so no duplicate reply is produced.
    SuppressRetry,
    /// URL verification handshake; the value is echoed back.
    Challenge(Value),
    /// Workspace outside the allow-list; carries the offending id.
    WorkspaceNotAllowed(String),
    /// Passed every check; carries the decoded body.
    Dispatch(Value),
}

/// Apply retry suppression, challenge echo and the workspace allow-list, in that order.
#[must_use]
pub fn gatekeep(config: &AppConfig, headers: &HeaderMap, body: &[u8]) -> GateDecision {
    if headers.contains_key(parsing::RETRY_NUM_HEADER) {
        return GateDecision::SuppressRetry;
    }

    let payload = parsing::decode_body(body);

    if let Some(challenge) = payload.get("challenge") {
        return GateDecision::Challenge(challenge.clone());
    }

    let team_id = parsing::team_id_from_payload(&payload).unwrap_or("");
    if !config.is_team_allowed(team_id) {
        return GateDecision::WorkspaceNotAllowed(team_id.to_string());
    }

    GateDecision::Dispatch(payload)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/slack/events", post(slack_events))
        .with_state(state)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[tracing::instrument(level = "debug", skip_all)]
pub async fn slack_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match gatekeep(&state.config, &headers, &body) {
        GateDecision::SuppressRetry => {
            info!(
                retry_num = parsing::get_header_value(&headers, parsing::RETRY_NUM_HEADER)
                    .unwrap_or(""),
                "Suppressing Slack retry"
            );
            StatusCode::NOT_FOUND.into_response()
        }
        GateDecision::Challenge(challenge) => helpers::ok_challenge(&challenge),
        GateDecision::WorkspaceNotAllowed(team_id) => {
            warn!(team_id = %team_id, "Rejecting request from workspace outside allow-list");
            helpers::err_response(
                StatusCode::FORBIDDEN,
                &format!("{team_id}:workspace_not_allowed"),
            )
        }
        GateDecision::Dispatch(payload) => {
            if let Err(response) = verify_signature(&body, &headers, &state.config) {
                return response;
            }
            event_handler::handle_event_callback(&state, &payload)
        }
    }
}

fn verify_signature(body: &[u8], headers: &HeaderMap, config: &AppConfig) -> Result<(), Response> {
    let Some(sig) = parsing::get_header_value(headers, parsing::SIGNATURE_HEADER) else {
        error!("Missing X-Slack-Signature header");
        return Err(helpers::err_response(
            StatusCode::UNAUTHORIZED,
            "Missing X-Slack-Signature header",
        ));
    };

    let Some(timestamp) = parsing::get_header_value(headers, parsing::TIMESTAMP_HEADER) else {
        error!("Missing X-Slack-Request-Timestamp header");
        return Err(helpers::err_response(
            StatusCode::UNAUTHORIZED,
            "Missing X-Slack-Request-Timestamp header",
        ));
    };

    let Ok(body_str) = std::str::from_utf8(body) else {
        return Err(helpers::err_response(
            StatusCode::BAD_REQUEST,
            "Invalid body encoding",
        ));
    };

    if !signature::verify_slack_signature(body_str, timestamp, sig, &config.slack_signing_secret) {
        error!("Slack signature verification failed");
        return Err(helpers::err_response(
            StatusCode::UNAUTHORIZED,
            "Invalid Slack signature",
        ));
    }

    Ok(())
}
