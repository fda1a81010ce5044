//! Test context
//!
//! Wires the services over the in-memory store and a recording messenger so
//! tests can drive the API router and the delivery service end to end.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use dramamu::api::{build_router, AppState};
use dramamu::config::Settings;
use dramamu::database::{MemoryStore, Stores};
use dramamu::services::{Messenger, ServiceFactory};
use dramamu::{DramamuError, Result};

use super::telegram_mock::TEST_BOT_TOKEN;
use super::test_data::signed_init_data;

/// One call made through the messenger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Video { chat_id: i64, video_url: String, caption: String },
    Text { chat_id: i64, text: String },
}

/// Messenger that records calls and fails on demand
#[derive(Debug, Default)]
pub struct FakeMessenger {
    fail_video: AtomicBool,
    fail_text: AtomicBool,
    delay: Mutex<Option<Duration>>,
    attempts: Mutex<Vec<Sent>>,
    delivered: Mutex<Vec<Sent>>,
}

impl FakeMessenger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_video(&self, fail: bool) {
        self.fail_video.store(fail, Ordering::SeqCst);
    }

    pub fn fail_text(&self, fail: bool) {
        self.fail_text.store(fail, Ordering::SeqCst);
    }

    pub fn fail_all(&self) {
        self.fail_video(true);
        self.fail_text(true);
    }

    /// Make every call hang for `delay` before answering
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn attempts(&self) -> Vec<Sent> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn delivered(&self) -> Vec<Sent> {
        self.delivered.lock().unwrap().clone()
    }

    async fn call(&self, sent: Sent, fail: bool) -> Result<()> {
        self.attempts.lock().unwrap().push(sent.clone());

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if fail {
            return Err(DramamuError::ServiceUnavailable("Forbidden: bot was blocked by the user".to_string()));
        }
        self.delivered.lock().unwrap().push(sent);
        Ok(())
    }
}

#[async_trait]
impl Messenger for FakeMessenger {
    async fn send_video(&self, chat_id: i64, video_url: &str, caption: &str) -> Result<()> {
        let sent = Sent::Video {
            chat_id,
            video_url: video_url.to_string(),
            caption: caption.to_string(),
        };
        self.call(sent, self.fail_video.load(Ordering::SeqCst)).await
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        let sent = Sent::Text {
            chat_id,
            text: text.to_string(),
        };
        self.call(sent, self.fail_text.load(Ordering::SeqCst)).await
    }
}

/// Settings for tests: a known bot token and a short delivery timeout
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.bot.token = TEST_BOT_TOKEN.to_string();
    settings.bot.username = "dramamu_bot".to_string();
    settings.bot.poster_path = None;
    settings.database.url = "memory://".to_string();
    settings.api.delivery_timeout_seconds = 1;
    settings
}

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub messenger: Arc<FakeMessenger>,
    pub settings: Settings,
    pub services: Arc<ServiceFactory>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_settings(test_settings())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let store = MemoryStore::new();
        Self::with_stores(settings, store.clone(), store.stores())
    }

    /// Use `stores` for the services while keeping `store` for assertions
    pub fn with_stores(settings: Settings, store: Arc<MemoryStore>, stores: Stores) -> Self {
        let messenger = FakeMessenger::new();
        let services = Arc::new(ServiceFactory::from_stores(stores, messenger.clone(), &settings));
        Self {
            store,
            messenger,
            settings,
            services,
        }
    }

    pub fn router(&self) -> Router {
        let state = AppState::new(self.services.clone(), &self.settings.api).expect("valid rate limit");
        build_router(state, &self.settings.api).expect("valid router configuration")
    }

    pub fn init_data_for(&self, user_id: i64) -> String {
        signed_init_data(&self.settings.bot.token, user_id)
    }
}

/// Send a request to the router and return (status, JSON body)
pub async fn send_request(router: &Router, method: Method, uri: &str, body: Option<String>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder
        .body(body.map(Body::from).unwrap_or_else(Body::empty))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    send_request(router, Method::GET, uri, None).await
}

pub async fn post_json(router: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send_request(router, Method::POST, uri, Some(body.to_string())).await
}
