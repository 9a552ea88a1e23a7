//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Route table sanity: direct first, relay templates carry `{url}`
//! - Validate value ranges (timeouts > 0, intervals > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use thiserror::Error;

use crate::config::schema::{ClientConfig, RouteKind};
use crate::routing::strategy::URL_PLACEHOLDER;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("gateway.base_url '{0}' is not a valid URL")]
    InvalidBaseUrl(String),

    #[error("no enabled routes")]
    NoRoutes,

    #[error("route '{0}' is a direct route but not the first enabled route")]
    DirectNotFirst(String),

    #[error("route '{0}' endpoint is missing the {{url}} placeholder")]
    MissingPlaceholder(String),

    #[error("route '{0}' has an empty cache parameter")]
    EmptyCacheParam(String),

    #[error("duplicate route name '{0}'")]
    DuplicateRoute(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if url::Url::parse(&config.gateway.base_url).is_err() {
        errors.push(ValidationError::InvalidBaseUrl(config.gateway.base_url.clone()));
    }

    if config.timeouts.direct_ms == 0 {
        errors.push(ValidationError::Zero("timeouts.direct_ms"));
    }
    if config.timeouts.relay_ms == 0 {
        errors.push(ValidationError::Zero("timeouts.relay_ms"));
    }
    if config.polling.balance_interval_secs == 0 {
        errors.push(ValidationError::Zero("polling.balance_interval_secs"));
    }
    if config.polling.payment_status_interval_secs == 0 {
        errors.push(ValidationError::Zero("polling.payment_status_interval_secs"));
    }
    if config.history.max_entries == 0 {
        errors.push(ValidationError::Zero("history.max_entries"));
    }

    let enabled: Vec<_> = config.routes.iter().filter(|r| r.enabled).collect();
    if enabled.is_empty() {
        errors.push(ValidationError::NoRoutes);
    }

    let mut seen = HashSet::new();
    for (i, route) in enabled.iter().enumerate() {
        if !seen.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateRoute(route.name.clone()));
        }
        if route.cache_param.trim().is_empty() {
            errors.push(ValidationError::EmptyCacheParam(route.name.clone()));
        }
        match route.kind {
            RouteKind::Direct if i != 0 => {
                errors.push(ValidationError::DirectNotFirst(route.name.clone()));
            }
            RouteKind::Relay if !route.endpoint.contains(URL_PLACEHOLDER) => {
                errors.push(ValidationError::MissingPlaceholder(route.name.clone()));
            }
            _ => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
