mod common;

use common::{FakeSlack, attachment, bot_message, user_message};
use slack_gemini_relay::RelayError;
use slack_gemini_relay::core::models::{ContentBlock, Part, Role};
use slack_gemini_relay::slack::THREAD_FETCH_LIMIT;
use slack_gemini_relay::worker::assemble::{EMPTY_THREAD_PLACEHOLDER, build_contents_from_thread};

#[tokio::test]
async fn test_messages_are_ordered_by_timestamp() {
    let slack = FakeSlack::with_messages(vec![
        user_message("1700000000.000200", "second"),
        user_message("1700000000.000010", "first"),
        user_message("1700000001.000000", "third"),
    ]);

    let contents = build_contents_from_thread(&slack, "C1", "1700000000.000010")
        .await
        .unwrap();

    let texts: Vec<&Part> = contents.iter().flat_map(|c| c.parts.iter()).collect();
    assert_eq!(
        texts,
        vec![
            &Part::Text("first".into()),
            &Part::Text("second".into()),
            &Part::Text("third".into()),
        ]
    );
}

#[tokio::test]
async fn test_fetch_uses_thread_anchor_and_limit() {
    let slack = FakeSlack::with_messages(vec![user_message("1.0", "hi")]);

    build_contents_from_thread(&slack, "C42", "1.0").await.unwrap();

    let fetches = slack.fetches.lock().unwrap().clone();
    assert_eq!(fetches, vec![("C42".to_string(), "1.0".to_string(), THREAD_FETCH_LIMIT)]);
}

#[tokio::test]
async fn test_roles_and_mention_stripping() {
    let slack = FakeSlack::with_messages(vec![
        user_message("1.0", "<@U0BOT> what is Rust?"),
        bot_message("2.0", "A systems language."),
        user_message("3.0", "<@U0BOT>"),
    ]);

    let contents = build_contents_from_thread(&slack, "C1", "1.0").await.unwrap();

    assert_eq!(
        contents,
        vec![
            ContentBlock::text(Role::User, "what is Rust?"),
            ContentBlock::text(Role::Model, "A systems language."),
        ]
    );
}

#[tokio::test]
async fn test_attachments_by_kind() {
    let mut msg = user_message("1.0", "see files");
    msg.files = vec![
        attachment("notes.txt", Some("text/plain"), "https://files/notes"),
        attachment("report.pdf", Some("application/pdf"), "https://files/report"),
        attachment("data.json", Some("application/json"), "https://files/data"),
    ];
    let slack = FakeSlack::with_messages(vec![msg])
        .with_file("https://files/notes", b"plain notes")
        .with_file("https://files/report", b"%PDF-1.7");

    let contents = build_contents_from_thread(&slack, "C1", "1.0").await.unwrap();

    assert_eq!(contents.len(), 1);
    assert_eq!(
        contents[0].parts,
        vec![
            Part::Text("see files".into()),
            Part::Text("plain notes".into()),
            Part::Bytes {
                mime_type: "application/pdf".into(),
                data: b"%PDF-1.7".to_vec(),
            },
        ]
    );
}

#[tokio::test]
async fn test_missing_mimetype_falls_back_to_file_name() {
    let mut msg = user_message("1.0", "");
    msg.files = vec![attachment("photo.png", None, "https://files/photo")];
    let slack = FakeSlack::with_messages(vec![msg]).with_file("https://files/photo", &[0x89, 0x50]);

    let contents = build_contents_from_thread(&slack, "C1", "1.0").await.unwrap();

    assert_eq!(
        contents[0].parts,
        vec![Part::Bytes {
            mime_type: "image/png".into(),
            data: vec![0x89, 0x50],
        }]
    );
}

#[tokio::test]
async fn test_invalid_utf8_text_file_is_decoded_lossily() {
    let mut msg = user_message("1.0", "");
    msg.files = vec![attachment("log.txt", Some("text/plain"), "https://files/log")];
    let slack = FakeSlack::with_messages(vec![msg]).with_file("https://files/log", &[b'o', b'k', 0xFF]);

    let contents = build_contents_from_thread(&slack, "C1", "1.0").await.unwrap();

    assert_eq!(contents[0].parts, vec![Part::Text("ok\u{FFFD}".into())]);
}

#[tokio::test]
async fn test_attachment_without_download_url_is_skipped() {
    let mut msg = user_message("1.0", "pdf below");
    let mut pdf = attachment("a.pdf", Some("application/pdf"), "");
    pdf.url_private_download = None;
    msg.files = vec![pdf];
    let slack = FakeSlack::with_messages(vec![msg]);

    let contents = build_contents_from_thread(&slack, "C1", "1.0").await.unwrap();

    assert_eq!(contents[0].parts, vec![Part::Text("pdf below".into())]);
}

#[tokio::test]
async fn test_empty_thread_yields_placeholder() {
    let mut only_json = user_message("2.0", "<@U0BOT>");
    only_json.files = vec![attachment("x.json", Some("application/json"), "https://files/x")];
    let slack = FakeSlack::with_messages(vec![user_message("1.0", "   "), only_json]);

    let contents = build_contents_from_thread(&slack, "C1", "1.0").await.unwrap();

    assert_eq!(contents, vec![ContentBlock::text(Role::User, EMPTY_THREAD_PLACEHOLDER)]);
}

#[tokio::test]
async fn test_failed_download_aborts_assembly() {
    let mut msg = user_message("1.0", "look");
    msg.files = vec![attachment("scan.pdf", Some("application/pdf"), "https://files/scan")];
    let slack = FakeSlack::with_messages(vec![msg]).with_failing_file("https://files/scan", "403 Forbidden");

    let err = build_contents_from_thread(&slack, "C1", "1.0").await.unwrap_err();

    assert!(matches!(err, RelayError::DownloadError(ref m) if m.contains("403")));
}

#[tokio::test]
async fn test_fetch_failure_is_returned() {
    let slack = FakeSlack {
        fetch_error: Some("channel_not_found".into()),
        ..Default::default()
    };

    let err = build_contents_from_thread(&slack, "C1", "1.0").await.unwrap_err();

    assert!(err.to_string().contains("channel_not_found"));
}
