/// Slack → Gemini relay - answers `@mentions` in a Slack thread with a reply
/// generated by Gemini on Vertex AI.
///
/// Each mention re-reads its whole thread, turns every message (text and
/// supported attachments) into a conversation turn, makes one
/// `generateContent` call, and posts the answer back into the thread.
/// Nothing is stored between requests.
///
/// # Architecture
///
/// The crate uses:
/// - axum for the webhook endpoint (`POST /slack/events`) and health check
/// - reqwest for the Slack Web API, file downloads, and Vertex AI
/// - slack-morphism for the bot credential and the startup `auth.test`
/// - Tokio for the async runtime; each reply runs on its own task
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use slack_gemini_relay::ai::GeminiClient;
/// use slack_gemini_relay::api::{AppState, router};
/// use slack_gemini_relay::core::config::AppConfig;
/// use slack_gemini_relay::slack::SlackClient;
/// use slack_gemini_relay::worker::Services;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     slack_gemini_relay::setup_logging();
///
///     let config = Arc::new(AppConfig::from_env()?);
///     let services = Services {
///         slack: Arc::new(SlackClient::new(
///             config.slack_bot_token.clone(),
///             config.slack_api_base.clone(),
///         )),
///         generator: Arc::new(GeminiClient::from_config(&config)),
///     };
///
///     let app = router(AppState { config: Arc::clone(&config), services });
///     let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
///     axum::serve(listener, app).await?;
///     Ok(())
/// }
/// ```
// Module declarations
pub mod ai;
pub mod api;
pub mod core;
pub mod errors;
pub mod slack;
pub mod utils;
pub mod worker;

pub use errors::RelayError;

/// Configure structured logging with JSON output.
///
/// The level comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
///
/// # Example
///
/// ```
/// slack_gemini_relay::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Resolves when the process receives Ctrl-C or, on Unix, `SIGTERM`.
///
/// The `SIGTERM` handler is installed before this returns, so a signal sent
/// right afterwards is not lost.
///
/// # Errors
///
/// Returns an error if the `SIGTERM` handler cannot be installed.
pub fn shutdown_signal() -> std::io::Result<impl std::future::Future<Output = ()>> {
    #[cfg(unix)]
    let mut terminate =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    Ok(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let sigterm = async {
            terminate.recv().await;
        };
        #[cfg(not(unix))]
        let sigterm = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
            () = sigterm => tracing::info!("Received SIGTERM, shutting down"),
        }
    })
}
