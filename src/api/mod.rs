//! Webhook HTTP surface: gatekeeper, signature check and event dispatch

pub mod event_handler;
pub mod handler;
pub mod helpers;
pub mod parsing;
pub mod signature;

// Re-export the router for convenience
pub use handler::{AppState, router};
