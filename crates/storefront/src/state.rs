//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::sync::SyncRegistry;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration and the registry of
/// per-shopper synchronizers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    registry: SyncRegistry,
}

impl AppState {
    #[must_use]
    pub fn new(config: StorefrontConfig, registry: SyncRegistry) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, registry }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the synchronizer registry.
    #[must_use]
    pub fn registry(&self) -> &SyncRegistry {
        &self.inner.registry
    }
}
