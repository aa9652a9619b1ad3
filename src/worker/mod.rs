//! Reply pipeline: thread assembly, generation and delivery

pub mod assemble;
pub mod deliver;
pub mod handler;

// Re-export the main entrypoints for convenience
pub use handler::{Services, handle_mention, spawn_mention_reply};

/// Prefix of the reply posted when the Gemini call fails.
pub const GEMINI_ERROR_PREFIX: &str = "Error from Gemini: ";

/// Prefix of the reply posted when the thread or one of its files cannot be read.
pub const THREAD_READ_ERROR_PREFIX: &str = "Sorry, I couldn't read this thread: ";
