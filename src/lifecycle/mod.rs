//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → Read credentials → Build executor → Session
//!
//! Shutdown (shutdown.rs):
//!     Owner triggers its token → its pollers observe → tasks exit
//!
//! Signals (signals.rs):
//!     SIGINT → trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then credentials, then network clients
//! - Cancellation reaches background pollers only; an in-flight executor
//!   invocation is never cancelled from outside

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{Session, StartupError};
