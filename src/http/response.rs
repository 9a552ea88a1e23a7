//! Classified results.
//!
//! # Responsibilities
//! - Hold the single usable payload an invocation produced
//! - Offer typed views (`data` envelope unwrapping, field lookup) to adapters
//!
//! # Design Decisions
//! - Structured bodies stay as `serde_json::Value`; adapters pick fields
//! - Non-JSON success bodies are kept verbatim as text, not treated as errors

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::http::error::{GatewayError, GatewayResult};

/// A usable response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Body parsed as JSON.
    Json(Value),
    /// Success body that is not JSON, trimmed.
    Text(String),
}

/// What one executor invocation yields.
pub type ClassifiedResult = GatewayResult<Payload>;

impl Payload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(v) => Some(v),
            Payload::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(t) => Some(t),
            Payload::Json(_) => None,
        }
    }

    /// The inner `data` object when the gateway wraps its answer, else the body.
    pub fn data(&self) -> Option<&Value> {
        let json = self.as_json()?;
        match json.get("data") {
            Some(inner) if !inner.is_null() => Some(inner),
            _ => Some(json),
        }
    }

    /// First string (or number) found at any of `keys`, looked up in
    /// `data` first and then at the top level.
    pub fn find_str(&self, keys: &[&str]) -> Option<String> {
        let json = self.as_json()?;
        let scopes = [json.get("data"), Some(json)];
        for scope in scopes.into_iter().flatten() {
            for key in keys {
                match scope.get(*key) {
                    Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
                    Some(Value::Number(n)) => return Some(n.to_string()),
                    _ => {}
                }
            }
        }
        None
    }

    /// Deserialize the `data` view into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> GatewayResult<T> {
        let data = self
            .data()
            .ok_or_else(|| GatewayError::Payload("expected a JSON body".to_string()))?;
        serde_json::from_value(data.clone()).map_err(|e| GatewayError::Payload(e.to_string()))
    }
}
