//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::settings::SettingsStore;
use crate::shopify::AdminClient;

/// Application state shared across all handlers.
///
/// Cheap to clone; handlers receive it via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    shopify: AdminClient,
    settings: SettingsStore,
}

impl AppState {
    /// Build the state from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `AdminApiError` if the Shopify client cannot be constructed.
    pub fn new(config: AdminConfig) -> Result<Self, crate::shopify::AdminApiError> {
        let shopify = AdminClient::new(&config.shopify)?;
        let settings = SettingsStore::new(&config.data_dir);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                shopify,
                settings,
            }),
        })
    }

    /// Application configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Shopify Admin API client.
    #[must_use]
    pub fn shopify(&self) -> &AdminClient {
        &self.inner.shopify
    }

    /// Merchant settings store.
    #[must_use]
    pub fn settings(&self) -> &SettingsStore {
        &self.inner.settings
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
