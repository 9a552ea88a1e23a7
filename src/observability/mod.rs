//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! executor, pollers:
//!     → tracing events (request_id, route, attempt fields)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → logging.rs subscriber (stderr, pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every attempt of one invocation
//! - Credentials never appear in any event

pub mod logging;
pub mod metrics;
