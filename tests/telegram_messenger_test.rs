//! TelegramMessenger against a mock Bot API server

mod helpers;

use dramamu::services::{Messenger, TelegramMessenger};
use helpers::*;

#[tokio::test]
async fn send_video_posts_url_and_html_caption() {
    let mock = TelegramMockServer::new().await;
    mock.mock_send_video(MockResponseConfig::default()).await;
    let messenger = TelegramMessenger::new(mock.bot());

    messenger
        .send_video(42, "https://cdn.example/goblin.mp4", "🎥 <b>Goblin</b>")
        .await
        .expect("video should be accepted");

    let requests = mock.requests_to("sendVideo").await;
    assert_eq!(requests.len(), 1);
    assert!(requests[0].contains("https://cdn.example/goblin.mp4"));
    assert!(requests[0].contains("🎥 <b>Goblin</b>"));
    assert!(requests[0].contains("HTML"));
}

#[tokio::test]
async fn send_text_posts_html_message() {
    let mock = TelegramMockServer::new().await;
    mock.mock_send_message(MockResponseConfig::default()).await;
    let messenger = TelegramMessenger::new(mock.bot());

    messenger.send_text(42, "🎬 <b>Goblin</b>").await.unwrap();

    let requests = mock.requests_to("sendMessage").await;
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_str(&requests[0]).unwrap();
    assert_eq!(body["chat_id"], 42);
    assert_eq!(body["text"], "🎬 <b>Goblin</b>");
    assert_eq!(body["parse_mode"], "HTML");
}

#[tokio::test]
async fn api_errors_surface_as_telegram_errors() {
    let mock = TelegramMockServer::new().await;
    mock.mock_send_message(MockResponseConfig::failing()).await;
    let messenger = TelegramMessenger::new(mock.bot());

    let result = messenger.send_text(42, "hello").await;

    assert!(matches!(result, Err(dramamu::DramamuError::Telegram(_))));
}

#[tokio::test]
async fn invalid_video_url_never_reaches_the_api() {
    let mock = TelegramMockServer::new().await;
    let messenger = TelegramMessenger::new(mock.bot());

    let result = messenger.send_video(42, "not a url", "caption").await;

    assert!(matches!(result, Err(dramamu::DramamuError::UrlParse(_))));
    assert!(mock.requests_to("sendVideo").await.is_empty());
}
