//! Gateway payment operations.
//!
//! Each operation builds one request descriptor and makes exactly one call
//! into the executor. Results and errors pass through unchanged.

use serde::Serialize;
use serde_json::json;

use crate::http::{Payload, RequestDescriptor, RequestExecutor};
use crate::payments::keys::{generate_external_id, only_digits, validate_transaction_id};
use crate::payments::types::{CreateChargeParams, PaymentResult, WithdrawParams};

const CHARGE_PATH: &str = "/gateway/pix-qrcode";
const CASH_OUT_PATH: &str = "/gateway/pix-cash-out";
const WALLET_PATH: &str = "/gateway/wallet";
const TRANSACTION_PATH: &str = "/gateway/transaction";

const DEFAULT_NAME: &str = "Cliente PatoPay";
const DEFAULT_EMAIL: &str = "vendas@patopay.com.br";
const DEFAULT_PHONE: &str = "11999999999";
const DEFAULT_CPF: &str = "00000000000";
const DEFAULT_TITLE: &str = "Venda PatoPay";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChargeBody {
    amount: f64,
    external_id: String,
    customer: Customer,
    items: Vec<Item>,
    payment_method: &'static str,
    installments: &'static str,
}

#[derive(Debug, Serialize)]
struct Customer {
    name: String,
    email: String,
    phone: String,
    document: Document,
}

#[derive(Debug, Serialize)]
struct Document {
    #[serde(rename = "type")]
    kind: &'static str,
    number: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Item {
    title: String,
    unit_price: f64,
    quantity: u32,
    tangible: bool,
}

#[derive(Debug, Serialize)]
struct CashOutBody {
    #[serde(rename = "externalId")]
    external_id: String,
    amount: f64,
    key_type: &'static str,
    document: String,
    pix_key: String,
}

/// Payment operations against one gateway.
#[derive(Debug, Clone)]
pub struct PaymentApi {
    executor: RequestExecutor,
    base_url: String,
}

impl PaymentApi {
    pub fn new(executor: RequestExecutor, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { executor, base_url }
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Create a PIX charge (QR code). Every call carries a fresh external id.
    pub async fn create_charge(&self, params: &CreateChargeParams) -> PaymentResult<Payload> {
        let request = RequestDescriptor::post_json(self.url(CHARGE_PATH), &charge_body(params))?;
        Ok(self.executor.execute(&request).await?)
    }

    /// Send a payout to a PIX key.
    pub async fn withdraw(&self, params: &WithdrawParams) -> PaymentResult<Payload> {
        let request = RequestDescriptor::post_json(self.url(CASH_OUT_PATH), &cash_out_body(params))?;
        Ok(self.executor.execute(&request).await?)
    }

    /// Fetch the wallet balance.
    pub async fn get_wallet(&self) -> PaymentResult<Payload> {
        let request = RequestDescriptor::post_json(self.url(WALLET_PATH), &json!({}))?;
        Ok(self.executor.execute(&request).await?)
    }

    /// Fetch one transaction by gateway id.
    pub async fn get_transaction(&self, id: &str) -> PaymentResult<Payload> {
        let id = validate_transaction_id(id)?;
        let request = RequestDescriptor::get(format!("{}/{}", self.url(TRANSACTION_PATH), id));
        Ok(self.executor.execute(&request).await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Id of a created charge or payout, wherever the gateway put it.
pub fn created_transaction_id(payload: &Payload) -> Option<String> {
    payload.find_str(&["idTransaction", "transactionId"])
}

fn or_default(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn charge_body(params: &CreateChargeParams) -> ChargeBody {
    ChargeBody {
        amount: params.amount,
        external_id: generate_external_id(),
        customer: Customer {
            name: or_default(&params.name, DEFAULT_NAME),
            email: or_default(&params.email, DEFAULT_EMAIL),
            phone: only_digits(&or_default(&params.phone, DEFAULT_PHONE)),
            document: Document {
                kind: "cpf",
                number: only_digits(&or_default(&params.cpf, DEFAULT_CPF)),
            },
        },
        items: vec![Item {
            title: or_default(&params.description, DEFAULT_TITLE),
            unit_price: params.amount,
            quantity: 1,
            tangible: false,
        }],
        payment_method: "pix",
        installments: "1",
    }
}

fn cash_out_body(params: &WithdrawParams) -> CashOutBody {
    CashOutBody {
        external_id: generate_external_id(),
        amount: params.amount,
        key_type: params.key_type.gateway_name(),
        document: only_digits(&params.document),
        pix_key: params.pix_key.trim().to_string(),
    }
}
