//! Route strategies: URL rewrites onto distinct network paths.
//!
//! # Responsibilities
//! - Append a cache-busting query parameter derived from the attempt timestamp
//! - Embed the busted target URL into a relay endpoint (relays only)
//!
//! # Design Decisions
//! - Pure functions of (url, timestamp); no I/O, no interior state
//! - The timestamp is an input so rewrites are deterministic under test
//! - Relays receive the target with its own cache buster already applied,
//!   so both the relay cache and the origin cache are defeated

use url::form_urlencoded;

use crate::config::schema::{RouteConfig, RouteKind, UrlEncoding};

/// Placeholder substituted by the target URL in relay endpoint templates.
pub const URL_PLACEHOLDER: &str = "{url}";

/// A network path to the gateway.
pub trait RouteStrategy: Send + Sync + std::fmt::Debug {
    /// Route identifier for logs and metrics.
    fn name(&self) -> &str;

    /// Whether this is the unproxied path.
    fn is_direct(&self) -> bool;

    /// Rewrite `url` so that fetching the result reaches the same destination
    /// through this route. `timestamp_ms` feeds the cache buster.
    fn rewrite(&self, url: &str, timestamp_ms: u128) -> String;
}

/// Calls the gateway directly.
#[derive(Debug, Clone)]
pub struct DirectRoute {
    name: String,
    cache_param: String,
}

impl DirectRoute {
    pub fn new(name: impl Into<String>, cache_param: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cache_param: cache_param.into(),
        }
    }
}

impl RouteStrategy for DirectRoute {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_direct(&self) -> bool {
        true
    }

    fn rewrite(&self, url: &str, timestamp_ms: u128) -> String {
        append_cache_buster(url, &self.cache_param, timestamp_ms)
    }
}

/// Reaches the gateway through a public relay endpoint.
#[derive(Debug, Clone)]
pub struct RelayRoute {
    name: String,
    endpoint: String,
    encoding: UrlEncoding,
    cache_param: String,
}

impl RelayRoute {
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        encoding: UrlEncoding,
        cache_param: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            encoding,
            cache_param: cache_param.into(),
        }
    }
}

impl RouteStrategy for RelayRoute {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_direct(&self) -> bool {
        false
    }

    fn rewrite(&self, url: &str, timestamp_ms: u128) -> String {
        let busted = append_cache_buster(url, &self.cache_param, timestamp_ms);
        let embedded = match self.encoding {
            UrlEncoding::Component => encode_component(&busted),
            UrlEncoding::Raw => busted,
        };
        self.endpoint.replacen(URL_PLACEHOLDER, &embedded, 1)
    }
}

/// Build a strategy from its configuration entry.
pub fn from_config(config: &RouteConfig) -> Box<dyn RouteStrategy> {
    match config.kind {
        RouteKind::Direct => Box::new(DirectRoute::new(&config.name, &config.cache_param)),
        RouteKind::Relay => Box::new(RelayRoute::new(
            &config.name,
            &config.endpoint,
            config.encoding,
            &config.cache_param,
        )),
    }
}

/// Append `param=timestamp_ms` using `?` or `&` as appropriate.
pub fn append_cache_buster(url: &str, param: &str, timestamp_ms: u128) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", url, sep, param, timestamp_ms)
}

fn encode_component(input: &str) -> String {
    form_urlencoded::byte_serialize(input.as_bytes()).collect()
}
