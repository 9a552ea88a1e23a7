//! Startup orchestration.
//!
//! # Responsibilities
//! - Read credentials from the environment named by the config
//! - Build the route table, executor and payment API in dependency order
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Credentials are injected here and nowhere else

use thiserror::Error;

use crate::config::{ClientConfig, ConfigError, Credentials};
use crate::http::{GatewayError, RequestExecutor};
use crate::payments::PaymentApi;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("client setup error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Everything a session needs to talk to the gateway.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: ClientConfig,
    pub api: PaymentApi,
}

impl Session {
    /// Build from a validated config, reading credentials from the
    /// environment variables it names.
    pub fn from_config(config: ClientConfig) -> Result<Self, StartupError> {
        let credentials = Credentials::from_env(&config.gateway)?;
        Self::with_credentials(config, &credentials)
    }

    /// Build from an already-validated config and injected credentials.
    pub fn with_credentials(config: ClientConfig, credentials: &Credentials) -> Result<Self, StartupError> {
        let executor = RequestExecutor::from_config(&config, credentials)?;
        let api = PaymentApi::new(executor, &config.gateway.base_url);

        tracing::info!(
            base_url = %config.gateway.base_url,
            routes = api.executor().routes().len(),
            direct_timeout_ms = config.timeouts.direct_ms,
            relay_timeout_ms = config.timeouts.relay_ms,
            "Gateway session ready"
        );

        Ok(Self { config, api })
    }
}
