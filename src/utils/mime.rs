//! MIME utilities shared across modules

use crate::core::models::ThreadFile;

/// How an attachment is forwarded to the model, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// Downloaded and decoded into a text part.
    Text,
    /// Downloaded and sent as raw bytes tagged with the MIME type.
    Binary,
    Unsupported,
}

/// Returns lowercase, parameter-stripped, canonical mime (`image/jpg` ⇒ `image/jpeg`).
#[must_use]
pub fn canonicalize_mime(mime: &str) -> String {
    let main = mime
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    match main.as_str() {
        "image/jpg" => "image/jpeg".to_string(),
        other => other.to_string(),
    }
}

#[must_use]
pub fn classify_mime(mime: &str) -> AttachmentKind {
    let canon = canonicalize_mime(mime);
    let Some((top, sub)) = canon.split_once('/') else {
        return AttachmentKind::Unsupported;
    };
    if sub.is_empty() {
        return AttachmentKind::Unsupported;
    }

    match top {
        "text" => AttachmentKind::Text,
        "image" | "video" | "audio" => AttachmentKind::Binary,
        "application" if sub == "pdf" => AttachmentKind::Binary,
        _ => AttachmentKind::Unsupported,
    }
}

/// Determine an attachment's MIME type: prefer Slack-provided mimetype, else
/// guess from the file name, else from the download URL path.
#[must_use]
pub fn resolve_file_mime(file: &ThreadFile) -> Option<String> {
    if let Some(m) = file.mimetype.as_deref().filter(|m| !m.trim().is_empty()) {
        return Some(canonicalize_mime(m));
    }

    let from_name = file
        .name
        .as_deref()
        .and_then(|name| mime_guess::from_path(name).first());
    let from_url = || {
        file.url_private_download
            .as_deref()
            .and_then(|u| url::Url::parse(u).ok())
            .and_then(|u| mime_guess::from_path(u.path()).first())
    };

    from_name
        .or_else(from_url)
        .map(|m| canonicalize_mime(m.essence_str()))
}
