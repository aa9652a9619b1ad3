use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

use slack_gemini_relay::ai::GeminiClient;
use slack_gemini_relay::api::{AppState, router};
use slack_gemini_relay::core::config::AppConfig;
use slack_gemini_relay::slack::SlackClient;
use slack_gemini_relay::worker::Services;
use slack_gemini_relay::RelayError;

#[tokio::main]
async fn main() -> Result<()> {
    slack_gemini_relay::setup_logging();

    let config = Arc::new(AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        RelayError::ConfigError(e)
    })?);

    let slack = Arc::new(SlackClient::new(
        config.slack_bot_token.clone(),
        config.slack_api_base.clone(),
    ));
    match slack.get_bot_user_id().await {
        Ok(bot_user_id) => info!(bot_user_id = %bot_user_id, "Slack token verified"),
        Err(e) => warn!("Could not verify Slack token at startup: {}", e),
    }

    let generator = Arc::new(GeminiClient::from_config(&config));
    info!(
        model = %generator.model_name(),
        project = %config.google_project,
        location = %config.google_location,
        allow_list = config.allowed_team_ids.len(),
        "Gemini client configured"
    );

    let state = AppState {
        config: Arc::clone(&config),
        services: Services { slack, generator },
    };

    let address = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!(bind_address = %address, "Listening for Slack events");

    let shutdown =
        slack_gemini_relay::shutdown_signal().context("failed to install signal handlers")?;

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server terminated unexpectedly")?;

    info!("Server stopped");
    Ok(())
}

