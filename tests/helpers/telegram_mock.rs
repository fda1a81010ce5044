//! Mock Telegram API server for testing
//!
//! Wraps a wiremock server that answers the Bot API methods the delivery flow
//! uses. Method names are matched case-insensitively since the Bot API accepts
//! both `sendMessage` and `SendMessage`.

use serde_json::{json, Value};
use teloxide::Bot;
use wiremock::{
    matchers::{method, path_regex},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_BOT_TOKEN: &str = "12345:test_token";

/// Mock Telegram API server for testing
pub struct TelegramMockServer {
    pub server: MockServer,
}

/// Configuration for mock responses
#[derive(Debug, Clone)]
pub struct MockResponseConfig {
    pub success: bool,
    pub delay_ms: Option<u64>,
}

impl Default for MockResponseConfig {
    fn default() -> Self {
        Self {
            success: true,
            delay_ms: None,
        }
    }
}

impl MockResponseConfig {
    pub fn failing() -> Self {
        Self {
            success: false,
            delay_ms: None,
        }
    }
}

impl TelegramMockServer {
    /// Create a new mock Telegram API server
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// A bot whose API calls go to this server
    pub fn bot(&self) -> Bot {
        let url = self.server.uri().parse().expect("mock server uri is a valid url");
        Bot::new(TEST_BOT_TOKEN).set_api_url(url)
    }

    /// Setup mock for sendVideo endpoint
    pub async fn mock_send_video(&self, config: MockResponseConfig) {
        self.mock_method("sendvideo", config, "Bad Request: wrong file identifier/HTTP URL specified")
            .await;
    }

    /// Setup mock for sendMessage endpoint
    pub async fn mock_send_message(&self, config: MockResponseConfig) {
        self.mock_method("sendmessage", config, "Forbidden: bot was blocked by the user")
            .await;
    }

    /// Bodies of every request received for `api_method`, JSON or multipart
    pub async fn requests_to(&self, api_method: &str) -> Vec<String> {
        let suffix = format!("/{}", api_method.to_lowercase());
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path().to_lowercase().ends_with(&suffix))
            .map(|request| String::from_utf8_lossy(&request.body).into_owned())
            .collect()
    }

    async fn mock_method(&self, api_method: &str, config: MockResponseConfig, error: &str) {
        let (status, body) = if config.success {
            (200, sent_message())
        } else {
            (
                400,
                json!({
                    "ok": false,
                    "error_code": 400,
                    "description": error
                }),
            )
        };

        let mut response = ResponseTemplate::new(status).set_body_json(body);
        if let Some(delay) = config.delay_ms {
            response = response.set_delay(std::time::Duration::from_millis(delay));
        }

        Mock::given(method("POST"))
            .and(path_regex(format!(r"(?i)/bot.+/{}$", api_method)))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }
}

fn sent_message() -> Value {
    json!({
        "ok": true,
        "result": {
            "message_id": 123,
            "date": 1640995200,
            "chat": {
                "id": 42,
                "type": "private",
                "first_name": "Test"
            },
            "text": "ok"
        }
    })
}
