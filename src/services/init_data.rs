//! Telegram Web App `initData` verification
//!
//! The Mini App receives a query-string assertion signed by Telegram with a key
//! derived from the bot token. Verification rebuilds the data-check string and
//! compares signatures in constant time.
//!
//! See <https://core.telegram.org/bots/webapps#validating-data-received-via-the-mini-app>.

use std::collections::BTreeMap;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

/// Key used to derive the per-bot secret from the bot token
const WEB_APP_DATA_KEY: &[u8] = b"WebAppData";

/// Identity carried in the `user` field of a verified assertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebAppUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
}

/// Verifies `initData` assertions for one bot
#[derive(Clone)]
pub struct InitDataVerifier {
    secret_key: [u8; 32],
    enabled: bool,
}

impl std::fmt::Debug for InitDataVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitDataVerifier")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl InitDataVerifier {
    /// Derive the signing key from the bot token (the shared secret)
    pub fn new(bot_token: &str) -> Self {
        let secret_key = hmac_sha256(WEB_APP_DATA_KEY, bot_token.as_bytes());
        Self {
            secret_key,
            enabled: !bot_token.is_empty(),
        }
    }

    /// Verify a raw assertion and return the signed identity.
    ///
    /// Any decoding problem, a missing or mismatched `hash`, or a `user` field
    /// without an integer `id` yields `None`.
    pub fn verify(&self, raw: &str) -> Option<WebAppUser> {
        if !self.enabled || raw.is_empty() {
            return None;
        }

        let mut fields = parse_fields(raw);
        let supplied_hash = fields.remove("hash")?;

        let calculated_hash = self.sign(&fields);
        let matches: bool = calculated_hash.as_bytes().ct_eq(supplied_hash.as_bytes()).into();
        if !matches {
            warn!("Telegram initData validation failed: hash mismatch");
            return None;
        }

        let user_json = fields.get("user")?;
        match serde_json::from_str::<WebAppUser>(user_json) {
            Ok(user) => {
                debug!(user_id = user.id, "Telegram initData verified");
                Some(user)
            }
            Err(e) => {
                warn!(error = %e, "Telegram initData carries an unreadable user field");
                None
            }
        }
    }

    /// Hex HMAC of the data-check string built from `fields` (which must not contain `hash`)
    pub fn sign(&self, fields: &BTreeMap<String, String>) -> String {
        hex::encode(hmac_sha256(&self.secret_key, data_check_string(fields).as_bytes()))
    }
}

/// Decode a query string into a sorted map; later duplicates win
fn parse_fields(raw: &str) -> BTreeMap<String, String> {
    url::form_urlencoded::parse(raw.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// `key=value` lines joined by `\n`, keys in byte order
fn data_check_string(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(message);
    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}
