use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::error;

/// Requests older than this many seconds are treated as replays.
const MAX_REQUEST_AGE_SECS: i64 = 300;
/// Tolerated clock skew for timestamps from the future.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Verify Slack's `X-Slack-Signature` for a request body against the signing secret.
#[must_use]
pub fn verify_slack_signature(
    request_body: &str,
    timestamp: &str,
    signature: &str,
    signing_secret: &str,
) -> bool {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0);
    verify_slack_signature_at(request_body, timestamp, signature, signing_secret, now)
}

/// Same as [`verify_slack_signature`] with an explicit "now" in unix seconds.
#[must_use]
pub fn verify_slack_signature_at(
    request_body: &str,
    timestamp: &str,
    signature: &str,
    signing_secret: &str,
    now_secs: i64,
) -> bool {
    let Ok(ts) = timestamp.trim().parse::<i64>() else {
        error!("Invalid X-Slack-Request-Timestamp: {:?}", timestamp);
        return false;
    };
    if now_secs.saturating_sub(ts) > MAX_REQUEST_AGE_SECS
        || ts.saturating_sub(now_secs) > MAX_CLOCK_SKEW_SECS
    {
        error!("Timestamp out of range, potential replay attack");
        return false;
    }

    let Some(received) = signature
        .strip_prefix("v0=")
        .and_then(|hex_sig| hex::decode(hex_sig).ok())
    else {
        error!("Malformed X-Slack-Signature header");
        return false;
    };

    let Some(mut mac) = new_mac(signing_secret) else {
        return false;
    };
    mac.update(format!("v0:{timestamp}:{request_body}").as_bytes());

    if mac.verify_slice(&received).is_ok() {
        true
    } else {
        error!("Signature verification failed");
        false
    }
}

/// Compute the `v0=` signature Slack would send for `request_body`.
#[must_use]
pub fn compute_signature(timestamp: &str, request_body: &str, signing_secret: &str) -> String {
    let Some(mut mac) = new_mac(signing_secret) else {
        return String::new();
    };
    mac.update(format!("v0:{timestamp}:{request_body}").as_bytes());
    format!("v0={}", hex::encode(mac.finalize().into_bytes()))
}

fn new_mac(signing_secret: &str) -> Option<Hmac<Sha256>> {
    match Hmac::<Sha256>::new_from_slice(signing_secret.as_bytes()) {
        Ok(mac) => Some(mac),
        Err(e) => {
            error!("Failed to create HMAC: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";
    const BODY: &str = r#"{"type":"event_callback","team_id":"T1"}"#;
    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_round_trip_signature_verifies() {
        let ts = NOW.to_string();
        let sig = compute_signature(&ts, BODY, SECRET);

        assert!(sig.starts_with("v0="));
        assert!(verify_slack_signature_at(BODY, &ts, &sig, SECRET, NOW));
    }

    #[test]
    fn test_tampered_body_fails() {
        let ts = NOW.to_string();
        let sig = compute_signature(&ts, BODY, SECRET);

        assert!(!verify_slack_signature_at("{}", &ts, &sig, SECRET, NOW));
        assert!(!verify_slack_signature_at(BODY, &ts, &sig, "other-secret", NOW));
    }

    #[test]
    fn test_stale_and_future_timestamps_fail() {
        let old = (NOW - 301).to_string();
        let future = (NOW + 61).to_string();

        assert!(!verify_slack_signature_at(
            BODY,
            &old,
            &compute_signature(&old, BODY, SECRET),
            SECRET,
            NOW
        ));
        assert!(!verify_slack_signature_at(
            BODY,
            &future,
            &compute_signature(&future, BODY, SECRET),
            SECRET,
            NOW
        ));
    }

    #[test]
    fn test_malformed_inputs_fail() {
        let ts = NOW.to_string();
        assert!(!verify_slack_signature_at(BODY, "not-a-number", "v0=00", SECRET, NOW));
        assert!(!verify_slack_signature_at(BODY, &ts, "v1=abcd", SECRET, NOW));
        assert!(!verify_slack_signature_at(BODY, &ts, "v0=zz", SECRET, NOW));
    }
}
