//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Gateway host and credential sources.
    pub gateway: GatewayConfig,

    /// Per-attempt deadlines.
    pub timeouts: TimeoutConfig,

    /// Ordered route strategies. File order is trial order.
    pub routes: Vec<RouteConfig>,

    /// Background polling intervals.
    pub polling: PollingConfig,

    /// Local withdrawal history.
    pub history: HistoryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            timeouts: TimeoutConfig::default(),
            routes: default_routes(),
            polling: PollingConfig::default(),
            history: HistoryConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Payment gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Gateway base URL (e.g., "https://api.cakto.com.br").
    pub base_url: String,

    /// Environment variable holding the client identifier.
    pub client_id_env: String,

    /// Environment variable holding the client secret.
    pub client_secret_env: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.cakto.com.br".to_string(),
            client_id_env: "PIX_GATEWAY_CLIENT_ID".to_string(),
            client_secret_env: "PIX_GATEWAY_CLIENT_SECRET".to_string(),
        }
    }
}

/// Per-attempt deadline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for the direct route in milliseconds.
    pub direct_ms: u64,

    /// Deadline for every relay route in milliseconds.
    pub relay_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            direct_ms: 3_500,
            relay_ms: 12_000,
        }
    }
}

/// Network path kind of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    Direct,
    Relay,
}

/// A single route strategy definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging/metrics.
    pub name: String,

    /// Direct call or public relay.
    pub kind: RouteKind,

    /// Relay endpoint template; `{url}` is replaced by the encoded target.
    /// Ignored for direct routes.
    #[serde(default)]
    pub endpoint: String,

    /// How the target URL is embedded in the relay endpoint.
    #[serde(default)]
    pub encoding: UrlEncoding,

    /// Cache-busting query parameter name.
    pub cache_param: String,

    /// Disabled routes are dropped when the table is built.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Encoding applied to the target URL before it is placed in a relay endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlEncoding {
    /// `application/x-www-form-urlencoded` serialization of the whole URL.
    /// Differs from JavaScript's `encodeURIComponent` on a few bytes: a space
    /// becomes `+`, and `!~'()` are escaped. Gateway URLs carry none of them.
    #[default]
    Component,
    /// Insert the URL as-is.
    Raw,
}

fn default_enabled() -> bool {
    true
}

impl RouteConfig {
    pub fn direct(name: &str, cache_param: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: RouteKind::Direct,
            endpoint: String::new(),
            encoding: UrlEncoding::Component,
            cache_param: cache_param.to_string(),
            enabled: true,
        }
    }

    pub fn relay(name: &str, endpoint: &str, cache_param: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: RouteKind::Relay,
            endpoint: endpoint.to_string(),
            encoding: UrlEncoding::Component,
            cache_param: cache_param.to_string(),
            enabled: true,
        }
    }
}

/// The stock route list: direct first, then three public relays.
pub fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::direct("direct", "t"),
        RouteConfig::relay("corsproxy", "https://corsproxy.io/?{url}", "cb"),
        RouteConfig::relay("allorigins", "https://api.allorigins.win/raw?url={url}", "cache"),
        RouteConfig::relay("codetabs", "https://api.codetabs.com/v1/proxy?quest={url}", "nocache"),
    ]
}

/// Background polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Wallet balance refresh interval in seconds.
    pub balance_interval_secs: u64,

    /// Payment status check interval in seconds.
    pub payment_status_interval_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            balance_interval_secs: 45,
            payment_status_interval_secs: 5,
        }
    }
}

/// Withdrawal history persistence.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// JSON file holding recent withdrawals.
    pub path: String,

    /// Number of entries kept, newest first.
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: "withdraw_history.json".to_string(),
            max_entries: 15,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
