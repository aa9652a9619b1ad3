use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

use crate::core::models::ThreadMessage;

// A compile failure leaves mentions in place and is logged once.
static LEADING_MENTION_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile_mention_regex(r"^\s*<@[^>\s]+>\s*"));

fn compile_mention_regex(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Mention regex failed to compile, mentions will not be stripped: {}", e);
            None
        }
    }
}

/// Removes one leading `<@U…>` mention and trims what is left.
#[must_use]
pub fn strip_leading_mention(text: &str) -> String {
    let stripped = match LEADING_MENTION_RE.as_ref() {
        Some(re) => re.replace(text, ""),
        None => text.into(),
    };
    stripped.trim().to_string()
}

/// Orders a Slack `ts` ("seconds.micros") without going through floats.
/// Unparsable timestamps sort first.
#[must_use]
pub fn ts_sort_key(ts: &str) -> (u64, u64) {
    let (secs, frac) = ts.trim().split_once('.').unwrap_or((ts.trim(), ""));
    let Ok(secs) = secs.parse::<u64>() else {
        return (0, 0);
    };
    if frac.is_empty() {
        return (secs, 0);
    }
    if !frac.bytes().all(|b| b.is_ascii_digit()) {
        return (0, 0);
    }

    let mut digits: String = frac.chars().take(6).collect();
    while digits.len() < 6 {
        digits.push('0');
    }
    (secs, digits.parse::<u64>().unwrap_or(0))
}

/// Stable ascending sort by timestamp.
pub fn sort_by_timestamp(messages: &mut [ThreadMessage]) {
    messages.sort_by_key(|m| ts_sort_key(&m.ts));
}
