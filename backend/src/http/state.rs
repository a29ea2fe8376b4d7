//! Application state for the HTTP server.

use std::sync::Arc;

use crate::checkout::PaymentGateway;
use crate::db::repo_config::PricingConfig;
use crate::db::repository::FullRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn FullRepository>,
    /// Payment gateway used by checkout
    pub gateway: Arc<dyn PaymentGateway>,
    /// Per-minute lesson pricing
    pub pricing: PricingConfig,
}

impl AppState {
    /// Create a new application state with the given collaborators.
    pub fn new(
        repository: Arc<dyn FullRepository>,
        gateway: Arc<dyn PaymentGateway>,
        pricing: PricingConfig,
    ) -> Self {
        Self {
            repository,
            gateway,
            pricing,
        }
    }
}
