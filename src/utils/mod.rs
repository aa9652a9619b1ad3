//! Small pure helpers for message text and attachments

pub mod filters;
pub mod mime;
