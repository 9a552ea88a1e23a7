//! Timeout enforcement.
//!
//! # Responsibilities
//! - Pick the per-attempt deadline for a route
//! - Wrap each attempt (send + body read) with that deadline
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Direct path gets a short deadline: a blocked or hanging direct call fails fast
//! - Relays get a long deadline: they add real latency and must not be cut early
//! - A timed-out attempt is a route failure, never retried on the same route

use std::future::Future;
use std::time::Duration;

use crate::config::schema::TimeoutConfig;
use crate::routing::RouteStrategy;

/// Deadlines applied to single attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptDeadlines {
    pub direct: Duration,
    pub relay: Duration,
}

impl AttemptDeadlines {
    pub fn for_route(&self, route: &dyn RouteStrategy) -> Duration {
        if route.is_direct() {
            self.direct
        } else {
            self.relay
        }
    }
}

impl From<&TimeoutConfig> for AttemptDeadlines {
    fn from(config: &TimeoutConfig) -> Self {
        Self {
            direct: Duration::from_millis(config.direct_ms),
            relay: Duration::from_millis(config.relay_ms),
        }
    }
}

impl Default for AttemptDeadlines {
    fn default() -> Self {
        Self::from(&TimeoutConfig::default())
    }
}

/// Run `fut` under `deadline`; `None` means the deadline fired first.
pub async fn run_with_deadline<F: Future>(deadline: Duration, fut: F) -> Option<F::Output> {
    tokio::time::timeout(deadline, fut).await.ok()
}
