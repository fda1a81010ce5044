//! Request bodies
//!
//! Mini App clients send ids either as JSON numbers or as numeric strings, so
//! numeric fields are accepted loosely and validated after deserialization.

use serde::Deserialize;
use serde_json::Value;
use crate::models::CreateWithdrawalRequest;
use crate::services::DeliveryRequest;
use crate::utils::errors::{DramamuError, Result};

/// A numeric field as it arrives on the wire
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(Value),
}

impl NumericField {
    fn is_blank(&self) -> bool {
        match self {
            NumericField::Text(text) => text.trim().is_empty(),
            NumericField::Other(Value::Null) => true,
            _ => false,
        }
    }

    /// Whole-number value; fractional, non-numeric and out-of-range input yields `None`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NumericField::Integer(value) => Some(*value),
            NumericField::Float(value) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => {
                Some(*value as i64)
            }
            NumericField::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}

fn present(field: Option<NumericField>) -> Option<NumericField> {
    field.filter(|value| !value.is_blank())
}

fn present_text(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

fn missing_fields() -> DramamuError {
    DramamuError::InvalidInput("Missing required fields".to_string())
}

/// Body of `POST /api/v1/handle_movie_request`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieRequestBody {
    #[serde(default)]
    pub chat_id: Option<NumericField>,
    #[serde(default)]
    pub movie_id: Option<NumericField>,
    #[serde(default)]
    pub init_data: Option<String>,
}

impl MovieRequestBody {
    pub fn into_delivery_request(self) -> Result<DeliveryRequest> {
        let (Some(chat_id), Some(movie_id), Some(init_data)) = (
            present(self.chat_id),
            present(self.movie_id),
            present_text(self.init_data),
        ) else {
            return Err(missing_fields());
        };

        let (Some(chat_id), Some(movie_id)) = (chat_id.as_i64(), movie_id.as_i64()) else {
            return Err(DramamuError::InvalidInput("Invalid ID format".to_string()));
        };

        Ok(DeliveryRequest {
            chat_id,
            movie_id,
            init_data,
        })
    }
}

/// Body of `POST /api/v1/withdraw_referral`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WithdrawReferralBody {
    #[serde(default)]
    pub telegram_id: Option<NumericField>,
    #[serde(default)]
    pub jumlah: Option<NumericField>,
    #[serde(default)]
    pub metode: Option<String>,
    #[serde(default)]
    pub nomor_rekening: Option<String>,
    #[serde(default)]
    pub nama_pemilik: Option<String>,
}

impl WithdrawReferralBody {
    pub fn into_withdrawal(self) -> Result<CreateWithdrawalRequest> {
        let (Some(telegram_id), Some(amount), Some(method), Some(account_number), Some(account_name)) = (
            present(self.telegram_id),
            present(self.jumlah),
            present_text(self.metode),
            present_text(self.nomor_rekening),
            present_text(self.nama_pemilik),
        ) else {
            return Err(missing_fields());
        };

        let (Some(telegram_id), Some(amount)) = (telegram_id.as_i64(), amount.as_i64()) else {
            return Err(DramamuError::InvalidInput("Invalid data format".to_string()));
        };

        Ok(CreateWithdrawalRequest {
            telegram_id,
            amount,
            method,
            account_number,
            account_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn movie_body(value: Value) -> Result<DeliveryRequest> {
        serde_json::from_value::<MovieRequestBody>(value)
            .unwrap()
            .into_delivery_request()
    }

    #[test]
    fn test_ids_accept_numbers_and_numeric_strings() {
        let request = movie_body(json!({"chat_id": "42", "movie_id": 7, "init_data": "x"})).unwrap();
        assert_eq!(request.chat_id, 42);
        assert_eq!(request.movie_id, 7);
    }

    #[test]
    fn test_missing_fields() {
        assert_matches!(
            movie_body(json!({"chat_id": 42, "init_data": "x"})),
            Err(DramamuError::InvalidInput(message)) if message == "Missing required fields"
        );
        assert_matches!(
            movie_body(json!({"chat_id": 42, "movie_id": null, "init_data": "x"})),
            Err(DramamuError::InvalidInput(message)) if message == "Missing required fields"
        );
        assert_matches!(
            movie_body(json!({"chat_id": 42, "movie_id": 7, "init_data": ""})),
            Err(DramamuError::InvalidInput(message)) if message == "Missing required fields"
        );
    }

    #[test]
    fn test_invalid_id_format() {
        for bad in [json!("abc"), json!(1.5), json!([1]), json!(true)] {
            assert_matches!(
                movie_body(json!({"chat_id": 42, "movie_id": bad, "init_data": "x"})),
                Err(DramamuError::InvalidInput(message)) if message == "Invalid ID format"
            );
        }
    }

    #[test]
    fn test_withdrawal_body() {
        let body: WithdrawReferralBody = serde_json::from_value(json!({
            "telegram_id": 42,
            "jumlah": "50000",
            "metode": "DANA",
            "nomor_rekening": "08123456789",
            "nama_pemilik": "Budi"
        }))
        .unwrap();
        let request = body.into_withdrawal().unwrap();
        assert_eq!(request.amount, 50000);
        assert_eq!(request.method, "DANA");

        let body: WithdrawReferralBody = serde_json::from_value(json!({
            "telegram_id": 42,
            "jumlah": "lima puluh",
            "metode": "DANA",
            "nomor_rekening": "08123456789",
            "nama_pemilik": "Budi"
        }))
        .unwrap();
        assert_matches!(
            body.into_withdrawal(),
            Err(DramamuError::InvalidInput(message)) if message == "Invalid data format"
        );
    }
}
