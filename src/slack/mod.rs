//! All Slack-specific functionality

pub mod client;
pub mod response_builder;

// Re-export main types for convenience
pub use client::{MAX_ATTACHMENT_BYTES, SlackApi, SlackClient, THREAD_FETCH_LIMIT};
