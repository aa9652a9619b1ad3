use std::error::Error;
use slack_gemini_relay::errors::RelayError;

#[test]
fn test_relay_error_implements_error_trait() {
    fn assert_error<T: Error + Send + Sync + 'static>(_: &T) {}

    let error = RelayError::ParseError("test error".to_string());
    assert_error(&error);
}

#[test]
fn test_relay_error_display() {
    let error = RelayError::ApiError("channel_not_found".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to access Slack API: channel_not_found"
    );

    let error = RelayError::GeminiError("Model unavailable".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to access Gemini API: Model unavailable"
    );

    let error = RelayError::DownloadError("403 Forbidden".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to download attachment: 403 Forbidden"
    );
}

#[test]
fn test_relay_error_from_conversions() {
    let err = anyhow::anyhow!("test error");
    let relay_err: RelayError = err.into();
    match relay_err {
        RelayError::ApiError(msg) => assert!(msg.contains("test error")),
        other => panic!("Unexpected error type: {other:?}"),
    }

    let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    assert!(matches!(RelayError::from(json_err), RelayError::ParseError(_)));

    // Compile-time check that reqwest errors convert.
    #[allow(unused)]
    #[allow(clippy::items_after_statements)]
    fn _check_reqwest_conversion(err: reqwest::Error) -> RelayError {
        RelayError::from(err)
    }
}
