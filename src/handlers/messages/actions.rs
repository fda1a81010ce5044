//! Actions posted by the Mini App through `Telegram.WebApp.sendData`

use serde_json::Value;
use teloxide::types::ChatId;
use crate::api::requests::{NumericField, WithdrawReferralBody};

/// An action posted by the Mini App
#[derive(Debug, Clone)]
pub enum WebAppAction {
    Watch { movie_id: Option<i64> },
    RequestDrama { title: String, app: String },
    WithdrawReferral(WithdrawReferralBody),
    Unknown(Option<String>),
}

impl WebAppAction {
    /// Parse the JSON payload; only malformed JSON is an error
    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(raw)?;

        let action = match value.get("action").and_then(Value::as_str) {
            Some("watch") => WebAppAction::Watch {
                movie_id: value
                    .get("movie_id")
                    .cloned()
                    .and_then(|id| serde_json::from_value::<NumericField>(id).ok())
                    .and_then(|id| id.as_i64()),
            },
            Some("request_drama") => WebAppAction::RequestDrama {
                title: text_or_dash(&value, "judul"),
                app: text_or_dash(&value, "apk"),
            },
            Some("withdraw_referral") => match serde_json::from_value(value.clone()) {
                Ok(body) => WebAppAction::WithdrawReferral(body),
                Err(_) => WebAppAction::WithdrawReferral(WithdrawReferralBody::default()),
            },
            other => WebAppAction::Unknown(other.map(str::to_string)),
        };

        Ok(action)
    }
}

fn text_or_dash(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .unwrap_or("-")
        .to_string()
}

pub(super) fn chat_id_field(chat_id: ChatId) -> NumericField {
    NumericField::Integer(chat_id.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_watch_accepts_string_ids() {
        assert_matches!(
            WebAppAction::parse(r#"{"action":"watch","movie_id":"12"}"#),
            Ok(WebAppAction::Watch { movie_id: Some(12) })
        );
        assert_matches!(
            WebAppAction::parse(r#"{"action":"watch"}"#),
            Ok(WebAppAction::Watch { movie_id: None })
        );
    }

    #[test]
    fn test_request_drama_defaults() {
        assert_matches!(
            WebAppAction::parse(r#"{"action":"request_drama","judul":"Goblin"}"#),
            Ok(WebAppAction::RequestDrama { title, app }) if title == "Goblin" && app == "-"
        );
    }

    #[test]
    fn test_unknown_and_malformed() {
        assert_matches!(
            WebAppAction::parse(r#"{"action":"dance"}"#),
            Ok(WebAppAction::Unknown(Some(action))) if action == "dance"
        );
        assert_matches!(WebAppAction::parse(r#"{"movie_id":1}"#), Ok(WebAppAction::Unknown(None)));
        assert!(WebAppAction::parse("{not json").is_err());
    }

    #[test]
    fn test_withdrawal_uses_body_fields() {
        let action = WebAppAction::parse(
            r#"{"action":"withdraw_referral","jumlah":50000,"metode":"DANA","nomor_rekening":"0812","nama_pemilik":"Budi"}"#,
        )
        .unwrap();

        let WebAppAction::WithdrawReferral(mut body) = action else {
            panic!("expected a withdrawal");
        };
        body.telegram_id = Some(chat_id_field(ChatId(42)));
        let request = body.into_withdrawal().unwrap();
        assert_eq!(request.telegram_id, 42);
        assert_eq!(request.amount, 50000);
    }
}
