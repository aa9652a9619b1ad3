use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use super::{GEMINI_ERROR_PREFIX, THREAD_READ_ERROR_PREFIX, assemble, deliver};
use crate::ai::ContentGenerator;
use crate::core::models::{ContentBlock, MentionEvent};
use crate::errors::RelayError;
use crate::slack::SlackApi;

/// The outbound collaborators a reply needs.
#[derive(Clone)]
pub struct Services {
    pub slack: Arc<dyn SlackApi>,
    pub generator: Arc<dyn ContentGenerator>,
}

/// Run the reply pipeline for `event` on its own task so the webhook can be
/// acknowledged right away.
pub fn spawn_mention_reply(services: Services, event: MentionEvent) -> JoinHandle<()> {
    let correlation_id = Uuid::new_v4().to_string();
    let span = info_span!(
        "mention_reply",
        correlation_id = %correlation_id,
        channel = %event.channel,
        thread_ts = %event.thread_anchor(),
    );

    tokio::spawn(
        async move {
            if let Err(e) = handle_mention(&services, &event).await {
                error!("Failed to post reply: {}", e);
            }
        }
        .instrument(span),
    )
}

/// Assemble the thread, ask the model once, and post whatever comes back.
///
/// Returns the text that was posted. Generation failures become an
/// `Error from Gemini:` reply and thread read failures a short apology, so the
/// only error left to return is a failed post.
///
/// # Errors
///
/// Returns an error if the reply cannot be posted to Slack.
pub async fn handle_mention(services: &Services, event: &MentionEvent) -> Result<String, RelayError> {
    let channel_id = event.channel.as_str();
    let thread_ts = event.thread_anchor();
    info!(user = ?event.user, "Handling app mention");

    let reply_text =
        match assemble::build_contents_from_thread(services.slack.as_ref(), channel_id, thread_ts)
            .await
        {
            Ok(contents) => generate_reply(Arc::clone(&services.generator), contents).await,
            Err(e) => {
                error!("Failed to assemble thread contents: {}", e);
                format!("{THREAD_READ_ERROR_PREFIX}{e}")
            }
        };

    deliver::post_reply(services.slack.as_ref(), channel_id, thread_ts, &reply_text).await?;
    Ok(reply_text)
}

/// One generation call on a separate task; never fails.
pub async fn generate_reply(
    generator: Arc<dyn ContentGenerator>,
    contents: Vec<ContentBlock>,
) -> String {
    let handle = tokio::spawn(async move { generator.generate(&contents).await });

    match handle.await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            error!("Gemini call failed: {}", e);
            format!("{GEMINI_ERROR_PREFIX}{e}")
        }
        Err(join_err) => {
            error!("Gemini task aborted: {}", join_err);
            format!("{GEMINI_ERROR_PREFIX}{join_err}")
        }
    }
}
