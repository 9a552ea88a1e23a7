//! Outbound gateway request subsystem.
//!
//! # Data Flow
//! ```text
//! payment adapter
//!     → request.rs (RequestDescriptor, base headers)
//!     → executor.rs (route loop)
//!         → routing (rewrite URL per route)
//!         → resilience (deadline, classify response)
//!     → response.rs (Payload) or error.rs (GatewayError)
//!     → back to adapter unchanged
//! ```
//!
//! # Design Decisions
//! - Only credential and exhaustion failures cross the executor boundary
//! - Exactly one result per invocation; no caching, no deduplication

pub mod error;
pub mod executor;
pub mod request;
pub mod response;

pub use error::{GatewayError, GatewayResult, RouteFailure};
pub use executor::RequestExecutor;
pub use request::{RequestDescriptor, X_REQUEST_ID};
pub use response::{ClassifiedResult, Payload};
