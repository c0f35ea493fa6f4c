//! Per-shopper synchronizer registry.
//!
//! Each storefront session gets its own [`EcoSync`] instances, keyed by a
//! random id kept in the session cookie. Product and cart pages get
//! separate instances that share one local choice store, so a choice made
//! on a product page survives into the cart. Idle sessions are swept out
//! and their poll tasks stopped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;

use crate::config::{ChoicePersistence, StorefrontConfig};
use crate::shopify::{CartClient, CartError};
use crate::store::{ChoiceStore, FileChoiceStore, MemoryChoiceStore};
use crate::sync::view::SharedView;
use crate::sync::{EcoSync, PageContext, SyncView, logging_handler};

/// Sweep period relative to the session TTL.
const SWEEP_DIVISOR: u32 = 4;

/// Errors from registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error("registry lock poisoned")]
    Poisoned,
}

/// One shopper's synchronizer plus the view it renders into.
#[derive(Clone)]
pub struct SyncHandle {
    pub sync: EcoSync,
    pub view: SharedView,
}

struct SessionEntry {
    store: Arc<dyn ChoiceStore>,
    handles: HashMap<PageContext, SyncHandle>,
    last_seen: Instant,
}

/// Registry of live synchronizers, swept for idleness.
#[derive(Clone)]
pub struct SyncRegistry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    config: StorefrontConfig,
    entries: RwLock<HashMap<String, SessionEntry>>,
    sweep_task: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for RegistryInner {
    fn drop(&mut self) {
        if let Ok(slot) = self.sweep_task.get_mut()
            && let Some(handle) = slot.take()
        {
            handle.abort();
        }
    }
}

impl SyncRegistry {
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                config,
                entries: RwLock::new(HashMap::new()),
                sweep_task: Mutex::new(None),
            }),
        }
    }

    /// Returns the synchronizer for `session` on `page`, creating and
    /// starting it on first use. Touches the session's idle clock.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if a new cart client cannot be built or the
    /// registry lock is poisoned.
    pub fn get_or_create(
        &self,
        session: &str,
        page: PageContext,
    ) -> Result<SyncHandle, RegistryError> {
        let mut entries = self
            .inner
            .entries
            .write()
            .map_err(|_| RegistryError::Poisoned)?;

        let now = Instant::now();
        let entry = entries
            .entry(session.to_string())
            .or_insert_with(|| SessionEntry {
                store: self.build_store(session),
                handles: HashMap::new(),
                last_seen: now,
            });
        entry.last_seen = now;

        if let Some(handle) = entry.handles.get(&page) {
            return Ok(handle.clone());
        }

        let handle = self.build_sync(Arc::clone(&entry.store), page)?;
        handle.sync.start_polling();
        entry.handles.insert(page, handle.clone());
        Ok(handle)
    }

    fn build_store(&self, session: &str) -> Arc<dyn ChoiceStore> {
        match self.inner.config.choice_persistence {
            ChoicePersistence::Memory => Arc::new(MemoryChoiceStore::new()),
            ChoicePersistence::File => {
                let path = self
                    .inner
                    .config
                    .data_dir
                    .join("choices")
                    .join(format!("{session}.json"));
                Arc::new(FileChoiceStore::new(path))
            }
        }
    }

    fn build_sync(
        &self,
        store: Arc<dyn ChoiceStore>,
        page: PageContext,
    ) -> Result<SyncHandle, RegistryError> {
        let cart = CartClient::new(self.inner.config.cart_base_url.clone())?;
        let view = SharedView::new();
        let view_dyn: Arc<dyn SyncView> = Arc::new(view.clone());
        let sync = EcoSync::new(
            cart,
            store,
            view_dyn,
            logging_handler(),
            self.inner.config.widget.clone(),
            page,
        );
        Ok(SyncHandle { sync, view })
    }

    /// Number of live sessions, for the readiness probe and logs.
    #[must_use]
    pub fn active_sessions(&self) -> usize {
        self.inner
            .entries
            .read()
            .map(|entries| entries.len())
            .unwrap_or(0)
    }

    /// Starts the idle sweeper. Sessions unseen for the configured TTL are
    /// removed and their poll tasks stopped.
    pub fn start_sweeper(&self) {
        let weak = Arc::downgrade(&self.inner);
        let ttl = self.inner.config.session_ttl;
        let period = ttl / SWEEP_DIVISOR;

        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                let Some(inner) = weak.upgrade() else { break };
                sweep_idle(&inner, ttl);
            }
        });

        if let Ok(mut slot) = self.inner.sweep_task.lock()
            && let Some(previous) = slot.replace(handle)
        {
            previous.abort();
        }
    }

    /// Stops the sweeper and every live synchronizer.
    pub fn shutdown(&self) {
        if let Ok(mut slot) = self.inner.sweep_task.lock()
            && let Some(handle) = slot.take()
        {
            handle.abort();
        }
        if let Ok(entries) = self.inner.entries.read() {
            for entry in entries.values() {
                for handle in entry.handles.values() {
                    handle.sync.shutdown();
                }
            }
        }
    }
}

fn sweep_idle(inner: &RegistryInner, ttl: Duration) {
    let Ok(mut entries) = inner.entries.write() else {
        return;
    };
    let now = Instant::now();
    entries.retain(|session, entry| {
        let keep = now.duration_since(entry.last_seen) <= ttl;
        if !keep {
            tracing::debug!(session = %session, "Sweeping idle packaging session");
            for handle in entry.handles.values() {
                handle.sync.shutdown();
            }
        }
        keep
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use eco_packaging_core::PackagingChoice;

    use super::*;
    use crate::config::WidgetConfig;
    use crate::sync::{StatusKind, StatusMessage};

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            store: "test.myshopify.com".to_string(),
            cart_base_url: "http://127.0.0.1:9/".parse().unwrap(),
            widget: WidgetConfig::default(),
            session_ttl: Duration::from_secs(60),
            choice_persistence: ChoicePersistence::Memory,
            data_dir: std::env::temp_dir().join("eco-registry-test"),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[tokio::test]
    async fn test_same_session_and_page_reuses_instance() {
        let registry = SyncRegistry::new(test_config());

        let first = registry.get_or_create("s1", PageContext::Cart).unwrap();
        let second = registry.get_or_create("s1", PageContext::Cart).unwrap();

        first.view.show_status(StatusMessage {
            kind: StatusKind::Info,
            text: "shared".to_string(),
        });
        assert_eq!(second.view.snapshot().status.unwrap().text, "shared");
        assert_eq!(registry.active_sessions(), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = SyncRegistry::new(test_config());

        let s1 = registry.get_or_create("s1", PageContext::Cart).unwrap();
        let s2 = registry.get_or_create("s2", PageContext::Cart).unwrap();

        s1.view.show_status(StatusMessage {
            kind: StatusKind::Info,
            text: "only s1".to_string(),
        });
        assert!(s2.view.snapshot().status.is_none());
        assert_eq!(registry.active_sessions(), 2);
    }

    #[tokio::test]
    async fn test_pages_share_the_session_store() {
        let registry = SyncRegistry::new(test_config());

        let product = registry.get_or_create("s1", PageContext::Product).unwrap();
        let _cart = registry.get_or_create("s1", PageContext::Cart).unwrap();

        // A deferred product-page choice lands in the shared store.
        product
            .sync
            .handle_choice_change(PackagingChoice::Minimal)
            .await;

        let entries = registry.inner.entries.read().unwrap();
        let entry = entries.get("s1").unwrap();
        assert_eq!(entry.handles.len(), 2);
        assert_eq!(entry.store.get().unwrap(), Some(PackagingChoice::Minimal));
    }

    #[tokio::test]
    async fn test_sweep_removes_idle_sessions() {
        let registry = SyncRegistry::new(test_config());
        registry.get_or_create("s1", PageContext::Cart).unwrap();

        {
            let mut entries = registry.inner.entries.write().unwrap();
            let entry = entries.get_mut("s1").unwrap();
            entry.last_seen = Instant::now() - Duration::from_secs(120);
        }
        sweep_idle(&registry.inner, Duration::from_secs(60));

        assert_eq!(registry.active_sessions(), 0);
    }

    #[tokio::test]
    async fn test_sweep_keeps_recent_sessions() {
        let registry = SyncRegistry::new(test_config());
        registry.get_or_create("s1", PageContext::Cart).unwrap();

        sweep_idle(&registry.inner, Duration::from_secs(60));

        assert_eq!(registry.active_sessions(), 1);
    }
}
