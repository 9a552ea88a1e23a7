//! Ordered route table.
//!
//! # Responsibilities
//! - Build the trial-ordered strategy list from configuration
//! - Hand out read-only views to executor invocations
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc without locks)
//! - Disabled routes are dropped at build time, never skipped at runtime
//! - Order in config is trial order

use std::sync::Arc;

use crate::config::schema::RouteConfig;
use crate::routing::strategy::{self, RouteStrategy};

/// Immutable, ordered list of route strategies.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Arc<[Box<dyn RouteStrategy>]>,
}

impl RouteTable {
    /// Build from already-constructed strategies.
    pub fn new(routes: Vec<Box<dyn RouteStrategy>>) -> Self {
        Self {
            routes: routes.into(),
        }
    }

    /// Build from configuration, keeping enabled routes in file order.
    pub fn from_config(routes: &[RouteConfig]) -> Self {
        let built: Vec<_> = routes
            .iter()
            .filter(|r| r.enabled)
            .map(strategy::from_config)
            .collect();

        tracing::debug!(
            routes = ?built.iter().map(|r| r.name()).collect::<Vec<_>>(),
            "Route table built"
        );

        Self::new(built)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn RouteStrategy> {
        self.routes.iter().map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
