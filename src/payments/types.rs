//! Payment domain types and error definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::http::{GatewayError, GatewayResult, Payload};

/// Caller input for a new PIX charge. Empty fields fall back to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateChargeParams {
    pub amount: f64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub cpf: Option<String>,
    pub description: Option<String>,
}

/// Caller input for a payout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawParams {
    pub amount: f64,
    pub key_type: PixKeyType,
    pub pix_key: String,
    pub document: String,
}

/// PIX key kinds as the caller names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixKeyType {
    Cpf,
    Email,
    Phone,
    /// Arbitrary key (EVP).
    Random,
}

impl PixKeyType {
    /// Name in the gateway's vocabulary.
    pub fn gateway_name(self) -> &'static str {
        match self {
            PixKeyType::Cpf => "cpf",
            PixKeyType::Email => "email",
            PixKeyType::Phone => "phone",
            PixKeyType::Random => "evp",
        }
    }
}

impl fmt::Display for PixKeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixKeyType::Cpf => "cpf",
            PixKeyType::Email => "email",
            PixKeyType::Phone => "phone",
            PixKeyType::Random => "random",
        };
        f.write_str(name)
    }
}

impl FromStr for PixKeyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpf" => Ok(PixKeyType::Cpf),
            "email" => Ok(PixKeyType::Email),
            "phone" => Ok(PixKeyType::Phone),
            "random" | "evp" => Ok(PixKeyType::Random),
            other => Err(format!("unknown PIX key type '{}'", other)),
        }
    }
}

/// Wallet balance as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub balance: f64,
    pub currency: String,
}

impl Wallet {
    /// Read a wallet from a payload, with or without a `data` envelope.
    /// The balance may arrive as a number or a numeric string.
    pub fn from_payload(payload: &Payload) -> GatewayResult<Self> {
        let data = payload
            .data()
            .ok_or_else(|| GatewayError::Payload("wallet response is not JSON".to_string()))?;

        let balance = match data.get("balance") {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(Value::Null) => Some(0.0),
            _ => None,
        }
        .ok_or_else(|| GatewayError::Payload("incomplete account response".to_string()))?;

        let currency = data
            .get("currency")
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
            .unwrap_or("BRL")
            .to_string();

        Ok(Self { balance, currency })
    }
}

/// Lifecycle state of a gateway transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Paid,
    Canceled,
    Refunded,
    Completed,
    #[serde(other)]
    Unknown,
}

impl TransactionStatus {
    /// Money has arrived; polling can stop.
    pub fn is_settled(self) -> bool {
        matches!(self, TransactionStatus::Paid | TransactionStatus::Completed)
    }
}

/// The parts of a transaction the client acts on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub status: TransactionStatus,
    #[serde(default, alias = "payment_code")]
    pub payment_code: Option<String>,
}

impl TransactionView {
    pub fn from_payload(payload: &Payload) -> GatewayResult<Self> {
        payload
            .decode()
            .map_err(|_| GatewayError::Payload("transaction not found in gateway response".to_string()))
    }
}

/// Errors that can occur in payment operations.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Enter a valid amount")]
    InvalidAmount,

    #[error("Insufficient balance: requested {requested:.2}, available {available:.2}")]
    InsufficientBalance { requested: f64, available: f64 },

    #[error("Invalid {key_type} key: {reason}")]
    InvalidPixKey { key_type: PixKeyType, reason: &'static str },

    #[error("Transaction identifier looks incomplete or corrupted")]
    InvalidTransactionId,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Result type for payment operations.
pub type PaymentResult<T> = Result<T, PaymentError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wallet_from_payload() {
        let wrapped = Payload::Json(json!({"data": {"balance": "150.50", "currency": "BRL"}}));
        assert_eq!(
            Wallet::from_payload(&wrapped).unwrap(),
            Wallet { balance: 150.5, currency: "BRL".into() }
        );

        let bare = Payload::Json(json!({"balance": 150.5}));
        assert_eq!(Wallet::from_payload(&bare).unwrap().currency, "BRL");

        let missing = Payload::Json(json!({"data": {"owner": "x"}}));
        assert!(Wallet::from_payload(&missing).is_err());
        assert!(Wallet::from_payload(&Payload::Text("OK".into())).is_err());
    }

    #[test]
    fn test_transaction_status() {
        let payload = Payload::Json(json!({"data": {"status": "paid", "paymentCode": "000201..."}}));
        let view = TransactionView::from_payload(&payload).unwrap();
        assert!(view.status.is_settled());
        assert_eq!(view.payment_code.as_deref(), Some("000201..."));

        let odd = Payload::Json(json!({"status": "chargeback"}));
        let view = TransactionView::from_payload(&odd).unwrap();
        assert_eq!(view.status, TransactionStatus::Unknown);
        assert!(!view.status.is_settled());
    }

    #[test]
    fn test_key_type_names() {
        assert_eq!(PixKeyType::Random.gateway_name(), "evp");
        assert_eq!("RANDOM".parse::<PixKeyType>().unwrap(), PixKeyType::Random);
        assert!("iban".parse::<PixKeyType>().is_err());
    }

    #[test]
    fn test_gateway_error_passes_through() {
        let err: PaymentError = GatewayError::Credentials.into();
        assert_eq!(err.to_string(), GatewayError::Credentials.to_string());
    }
}
