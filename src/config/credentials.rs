//! Gateway credential sourcing.
//!
//! # Security
//! - Credentials are loaded ONLY from environment variables
//! - Values are never logged; `Debug` is redacted

use std::fmt;

use crate::config::loader::ConfigError;
use crate::config::schema::GatewayConfig;

/// Client identifier and secret sent with every gateway request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Read credentials from the environment variables named in `config`.
    pub fn from_env(config: &GatewayConfig) -> Result<Self, ConfigError> {
        let client_id = read_var(&config.client_id_env)?;
        let client_secret = read_var(&config.client_secret_env)?;
        tracing::debug!(
            client_id_env = %config.client_id_env,
            "Gateway credentials loaded"
        );
        Ok(Self::new(client_id, client_secret))
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

fn read_var(name: &str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingCredential(name.to_string())),
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &"<redacted>")
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
