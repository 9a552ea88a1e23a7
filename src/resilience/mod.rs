//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Attempt on one route:
//!     → timeouts.rs (deadline by route kind, covers send + body read)
//!     → classify.rs (precheck on status, then body heuristics)
//!     → Verdict: Accept / Skip / Unauthorized
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every attempt has a deadline
//! - No retry of the same route; the next route is the retry
//! - Heuristics are pure functions of status and body text

pub mod classify;
pub mod timeouts;

pub use classify::{classify, precheck, Verdict};
pub use timeouts::AttemptDeadlines;
