//! Failure taxonomy of the request executor.

use std::time::Duration;
use thiserror::Error;

/// Message shown when the gateway rejects the credentials.
pub const CREDENTIALS_MESSAGE: &str =
    "Invalid API credentials: verify the gateway client id and client secret.";

/// Message shown when every route has failed.
pub const EXHAUSTED_MESSAGE: &str =
    "Unstable connection: the payment gateway is unreachable through every route. \
     Disable ad blockers or VPNs and try again later.";

/// Errors that cross the executor boundary.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Unauthorized response on any route. Fatal, no other route is tried.
    #[error("{}", CREDENTIALS_MESSAGE)]
    Credentials,

    /// Every route failed.
    #[error("{}", EXHAUSTED_MESSAGE)]
    Exhausted { attempts: usize },

    /// The request descriptor could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    /// A successful payload did not have the expected shape.
    #[error("Unexpected gateway response: {0}")]
    Payload(String),
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Why a single route attempt was abandoned. Never leaves the executor.
#[derive(Debug, Error)]
pub enum RouteFailure {
    #[error("deadline of {0:?} elapsed")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("relay returned an HTML page")]
    BlockedRelay,

    #[error("failing status {0}")]
    Status(u16),
}

impl RouteFailure {
    /// Short label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            RouteFailure::Timeout(_) => "timeout",
            RouteFailure::Transport(_) => "transport",
            RouteFailure::BlockedRelay => "blocked",
            RouteFailure::Status(_) => "status",
        }
    }
}
