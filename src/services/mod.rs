//! Business logic services

pub mod lending;

use std::sync::Arc;

use crate::repository::CatalogStore;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub lending: lending::LendingService,
}

impl Services {
    /// Create all services with the given store handle
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            lending: lending::LendingService::new(store),
        }
    }
}
