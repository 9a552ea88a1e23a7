//! Multi-route request executor.
//!
//! # Responsibilities
//! - Try each route of the table in order, one attempt per route
//! - Enforce the per-attempt deadline of the route kind
//! - Stop at the first usable payload or at a credential failure
//! - Turn exhaustion of the table into a single terminal error
//!
//! # Design Decisions
//! - Attempts run sequentially; a later route is tried only once the earlier
//!   one has definitely failed (free relays have quotas)
//! - No state is shared between invocations: each call gets its own request
//!   id, its own timestamps, its own deadlines
//! - Route failures are logged and counted but never returned

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use uuid::Uuid;

use crate::config::{ClientConfig, Credentials};
use crate::http::error::{GatewayError, RouteFailure};
use crate::http::request::{base_headers, RequestDescriptor, X_REQUEST_ID};
use crate::http::response::ClassifiedResult;
use crate::observability::metrics;
use crate::resilience::classify::{self, Verdict};
use crate::resilience::timeouts::{run_with_deadline, AttemptDeadlines};
use crate::routing::{RouteStrategy, RouteTable};

/// Transient record of one route attempt.
#[derive(Debug)]
pub struct AttemptOutcome {
    pub index: usize,
    pub verdict: Verdict,
    pub elapsed: Duration,
}

/// Sends gateway requests through the route table.
#[derive(Clone)]
pub struct RequestExecutor {
    client: Client,
    routes: RouteTable,
    deadlines: AttemptDeadlines,
    base_headers: Arc<HeaderMap>,
}

impl RequestExecutor {
    /// Create an executor over an existing HTTP client.
    pub fn new(
        client: Client,
        routes: RouteTable,
        deadlines: AttemptDeadlines,
        credentials: &Credentials,
    ) -> Result<Self, GatewayError> {
        Ok(Self {
            client,
            routes,
            deadlines,
            base_headers: Arc::new(base_headers(credentials)?),
        })
    }

    /// Create an executor from validated configuration.
    pub fn from_config(config: &ClientConfig, credentials: &Credentials) -> Result<Self, GatewayError> {
        let client = Client::builder().build().map_err(GatewayError::Client)?;
        Self::new(
            client,
            RouteTable::from_config(&config.routes),
            AttemptDeadlines::from(&config.timeouts),
            credentials,
        )
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Deliver `request`, returning exactly one classified result.
    pub async fn execute(&self, request: &RequestDescriptor) -> ClassifiedResult {
        let request_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        tracing::debug!(
            request_id = %request_id,
            method = %request.method(),
            url = %request.url(),
            routes = self.routes.len(),
            "Executing gateway request"
        );

        for (index, route) in self.routes.iter().enumerate() {
            let outcome = self.attempt(index, route, request, &request_id).await;
            metrics::record_attempt(route.name(), verdict_label(&outcome.verdict), outcome.elapsed);

            match outcome.verdict {
                Verdict::Accept(payload) => {
                    tracing::debug!(
                        request_id = %request_id,
                        route = route.name(),
                        attempt = index,
                        elapsed_ms = outcome.elapsed.as_millis() as u64,
                        "Gateway request succeeded"
                    );
                    metrics::record_invocation("success", start);
                    return Ok(payload);
                }
                Verdict::Unauthorized => {
                    tracing::error!(
                        request_id = %request_id,
                        route = route.name(),
                        attempt = index,
                        "Gateway rejected credentials, aborting"
                    );
                    metrics::record_invocation("credentials", start);
                    return Err(GatewayError::Credentials);
                }
                Verdict::Skip(failure) => {
                    log_skip(&request_id, route, index, &failure, outcome.elapsed);
                }
            }
        }

        tracing::warn!(
            request_id = %request_id,
            attempts = self.routes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "All routes exhausted"
        );
        metrics::record_invocation("exhausted", start);
        Err(GatewayError::Exhausted {
            attempts: self.routes.len(),
        })
    }

    async fn attempt(
        &self,
        index: usize,
        route: &dyn RouteStrategy,
        request: &RequestDescriptor,
        request_id: &str,
    ) -> AttemptOutcome {
        let start = Instant::now();
        let url = route.rewrite(request.url(), now_millis());
        let deadline = self.deadlines.for_route(route);

        let mut headers = request.merged_headers(&self.base_headers);
        if !headers.contains_key(X_REQUEST_ID) {
            if let Ok(value) = HeaderValue::from_str(request_id) {
                headers.insert(X_REQUEST_ID, value);
            }
        }

        let mut builder = self
            .client
            .request(request.method().clone(), &url)
            .headers(headers);
        if let Some(body) = request.body() {
            builder = builder.body(body.to_string());
        }

        let is_direct = route.is_direct();
        let exchange = async move {
            let response = builder.send().await?;
            let status = response.status();
            if let Some(verdict) = classify::precheck(is_direct, status) {
                return Ok(verdict);
            }
            let text = response.text().await?;
            Ok::<_, reqwest::Error>(classify::classify(status, &text))
        };

        let verdict = match run_with_deadline(deadline, exchange).await {
            Some(Ok(verdict)) => verdict,
            Some(Err(e)) => Verdict::Skip(RouteFailure::Transport(e)),
            None => Verdict::Skip(RouteFailure::Timeout(deadline)),
        };

        AttemptOutcome {
            index,
            verdict,
            elapsed: start.elapsed(),
        }
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("routes", &self.routes.iter().map(|r| r.name()).collect::<Vec<_>>())
            .field("deadlines", &self.deadlines)
            .finish()
    }
}

fn log_skip(request_id: &str, route: &dyn RouteStrategy, index: usize, failure: &RouteFailure, elapsed: Duration) {
    match failure {
        // A failing gateway status through a working relay may be a real
        // rejection; keep it visible.
        RouteFailure::Status(status) if !route.is_direct() => tracing::warn!(
            request_id = %request_id,
            route = route.name(),
            attempt = index,
            status = *status,
            "Relay returned failing status, trying next route"
        ),
        _ => tracing::info!(
            request_id = %request_id,
            route = route.name(),
            attempt = index,
            reason = %failure,
            elapsed_ms = elapsed.as_millis() as u64,
            "Route failed, trying next route"
        ),
    }
}

fn verdict_label(verdict: &Verdict) -> &'static str {
    match verdict {
        Verdict::Accept(_) => "accepted",
        Verdict::Unauthorized => "unauthorized",
        Verdict::Skip(failure) => failure.label(),
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}
