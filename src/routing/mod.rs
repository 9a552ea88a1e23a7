//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → strategy.rs (direct / relay rewrite per entry)
//!     → table.rs (drop disabled, freeze order)
//!
//! Per attempt:
//!     target URL + timestamp
//!     → RouteStrategy::rewrite
//!     → URL for this network path
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same URL and timestamp always yield the same rewrite
//! - Trial order is table order; index 0 is the direct path

pub mod strategy;
pub mod table;

pub use strategy::{DirectRoute, RelayRoute, RouteStrategy};
pub use table::RouteTable;
