//! Request descriptors and gateway headers.
//!
//! # Responsibilities
//! - Describe one logical gateway call (method, target URL, headers, body)
//! - Build the base header set every gateway call carries
//! - Merge caller headers over the base set
//!
//! # Design Decisions
//! - Descriptors are immutable once built and owned by a single invocation
//! - Credential headers are duplicated under `X-` names; some relays strip
//!   unprefixed custom headers
//! - Credential header values are marked sensitive so they never show in debug output

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;

use crate::config::Credentials;
use crate::http::error::{GatewayError, GatewayResult};

/// Header carrying the per-invocation correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

const CLIENT_ID_HEADERS: [&str; 2] = ["client-id", "x-client-id"];
const CLIENT_SECRET_HEADERS: [&str; 2] = ["client-secret", "x-client-secret"];

/// One logical call to the gateway.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Option<String>,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// POST with `body` serialized as JSON.
    pub fn post_json<T: Serialize>(url: impl Into<String>, body: &T) -> GatewayResult<Self> {
        let body = serde_json::to_string(body)
            .map_err(|e| GatewayError::InvalidRequest(format!("body serialization: {}", e)))?;
        Ok(Self::new(Method::POST, url).with_body(body))
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a caller header; it overrides any base header of the same name.
    pub fn with_header(mut self, name: &str, value: &str) -> GatewayResult<Self> {
        let name = HeaderName::try_from(name)
            .map_err(|e| GatewayError::InvalidRequest(format!("header name '{}': {}", name, e)))?;
        let value = HeaderValue::try_from(value)
            .map_err(|e| GatewayError::InvalidRequest(format!("header value for '{}': {}", name, e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Base headers with this descriptor's headers merged on top.
    pub fn merged_headers(&self, base: &HeaderMap) -> HeaderMap {
        let mut merged = base.clone();
        for (name, value) in &self.headers {
            merged.insert(name.clone(), value.clone());
        }
        merged
    }
}

/// Identity and content negotiation headers required by the gateway.
pub fn base_headers(credentials: &Credentials) -> GatewayResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    let id = sensitive(credentials.client_id())?;
    let secret = sensitive(credentials.client_secret())?;
    for name in CLIENT_ID_HEADERS {
        headers.insert(HeaderName::from_static(name), id.clone());
    }
    for name in CLIENT_SECRET_HEADERS {
        headers.insert(HeaderName::from_static(name), secret.clone());
    }

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    Ok(headers)
}

fn sensitive(value: &str) -> GatewayResult<HeaderValue> {
    let mut value = HeaderValue::try_from(value)
        .map_err(|_| GatewayError::InvalidRequest("credential is not a valid header value".to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}
