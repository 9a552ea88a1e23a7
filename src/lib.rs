//! Resilient client for a PIX payment gateway.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod payments;
pub mod resilience;
pub mod routing;

pub use config::ClientConfig;
pub use http::{GatewayError, Payload, RequestDescriptor, RequestExecutor};
pub use lifecycle::{Session, Shutdown};
pub use payments::PaymentApi;
