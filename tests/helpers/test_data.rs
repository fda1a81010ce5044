//! Test data builders

use std::collections::BTreeMap;
use dramamu::services::InitDataVerifier;

/// A Mini App `initData` string signed for `user_id` with `bot_token`
pub fn signed_init_data(bot_token: &str, user_id: i64) -> String {
    let user = format!(r#"{{"id":{},"first_name":"Test","language_code":"id"}}"#, user_id);

    let mut fields = BTreeMap::new();
    fields.insert("auth_date".to_string(), "1700000000".to_string());
    fields.insert("query_id".to_string(), "AAH-test".to_string());
    fields.insert("user".to_string(), user.clone());
    let hash = InitDataVerifier::new(bot_token).sign(&fields);

    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("query_id", "AAH-test")
        .append_pair("user", &user)
        .append_pair("auth_date", "1700000000")
        .append_pair("hash", &hash)
        .finish()
}

fn private_message(user_id: i64, extra: serde_json::Value) -> teloxide::types::Message {
    let mut message = serde_json::json!({
        "message_id": 1,
        "date": 1700000000,
        "chat": {"id": user_id, "type": "private", "first_name": "Test"},
        "from": {"id": user_id, "is_bot": false, "first_name": "Test", "language_code": "id"}
    });
    if let (Some(message), Some(extra)) = (message.as_object_mut(), extra.as_object()) {
        message.extend(extra.clone());
    }
    serde_json::from_value(message).expect("valid message json")
}

/// A private text message; a leading `/command` gets a bot_command entity
pub fn text_message(user_id: i64, text: &str) -> teloxide::types::Message {
    let mut extra = serde_json::json!({ "text": text });
    if text.starts_with('/') {
        let length = text.split_whitespace().next().map(str::len).unwrap_or(0);
        extra["entities"] = serde_json::json!([{"type": "bot_command", "offset": 0, "length": length}]);
    }
    private_message(user_id, extra)
}

/// A service message carrying Mini App data
pub fn web_app_message(user_id: i64, data: &str) -> teloxide::types::Message {
    private_message(
        user_id,
        serde_json::json!({ "web_app_data": {"data": data, "button_text": "Dramamu"} }),
    )
}
