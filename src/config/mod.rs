//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!
//! environment
//!     → credentials.rs (client id / secret, never logged)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the route table is built from it once
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Secrets never live in the file, only the names of the variables holding them

pub mod credentials;
pub mod loader;
pub mod schema;
pub mod validation;

pub use credentials::Credentials;
pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ClientConfig, GatewayConfig, HistoryConfig, LogFormat, ObservabilityConfig, PollingConfig,
    RouteConfig, RouteKind, TimeoutConfig, UrlEncoding,
};
