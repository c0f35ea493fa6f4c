//! Cart-state synchronizer.
//!
//! [`EcoSync`] keeps three copies of the shopper's packaging choice in
//! agreement: the shopper-local store, the widget view, and the
//! `eco_packaging` cart attribute on the platform. The pipeline is
//! fail-open end to end; a cart hiccup degrades the widget but never blocks
//! checkout.
//!
//! Collaborators are injected at construction, so every piece (cart client,
//! store, view, outcome handler) can be swapped in tests.

pub mod eligibility;
pub mod outcome;
pub mod registry;
pub mod strings;
pub mod view;

pub use eligibility::{EligibilityResult, check_eligibility};
pub use outcome::{OutcomeHandler, SyncError, SyncOutcome, logging_handler};
pub use registry::{RegistryError, SyncHandle, SyncRegistry};
pub use view::{SharedView, StatusKind, StatusMessage, SyncView, WidgetViewState};

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::instrument;

use eco_packaging_core::PackagingChoice;

use crate::config::WidgetConfig;
use crate::shopify::{CartClient, CartError, CartSnapshot, DiscountActivation};
use crate::store::ChoiceStore;

/// How long non-error status messages stay visible.
const STATUS_HOLD: Duration = Duration::from_secs(4);

/// Cart event fan-out capacity. Slow subscribers miss events rather than
/// blocking the pipeline.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Which storefront page hosts the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageContext {
    /// Product pages persist the choice locally and defer cart writes.
    Product,
    /// The cart page applies changes to the live cart immediately.
    Cart,
}

/// Broadcast to interested parties after the cart changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    Updated { choice: PackagingChoice },
}

/// The cart-state synchronizer. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct EcoSync {
    inner: Arc<SyncInner>,
}

struct SyncInner {
    cart: CartClient,
    store: Arc<dyn ChoiceStore>,
    view: Arc<dyn SyncView>,
    on_outcome: OutcomeHandler,
    config: WidgetConfig,
    page: PageContext,
    is_updating: AtomicBool,
    last_applied: Mutex<Option<PackagingChoice>>,
    discount_generation: AtomicU64,
    status_generation: AtomicU64,
    events: broadcast::Sender<CartEvent>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for SyncInner {
    fn drop(&mut self) {
        if let Ok(slot) = self.poll_task.get_mut()
            && let Some(handle) = slot.take()
        {
            handle.abort();
        }
    }
}

/// Clears the in-flight flag and loading indicator on every exit path,
/// including a caller dropped mid-await.
struct InFlightGuard {
    inner: Arc<SyncInner>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.inner.is_updating.store(false, Ordering::Release);
        self.inner.view.set_loading(false);
    }
}

impl EcoSync {
    #[must_use]
    pub fn new(
        cart: CartClient,
        store: Arc<dyn ChoiceStore>,
        view: Arc<dyn SyncView>,
        on_outcome: OutcomeHandler,
        config: WidgetConfig,
        page: PageContext,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(SyncInner {
                cart,
                store,
                view,
                on_outcome,
                config,
                page,
                is_updating: AtomicBool::new(false),
                last_applied: Mutex::new(None),
                discount_generation: AtomicU64::new(0),
                status_generation: AtomicU64::new(0),
                events,
                poll_task: Mutex::new(None),
            }),
        }
    }

    /// The page context this instance was created for.
    #[must_use]
    pub fn page(&self) -> PageContext {
        self.inner.page
    }

    /// Subscribes to cart-updated events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.inner.events.subscribe()
    }

    // =========================================================================
    // State restoration
    // =========================================================================

    /// Restores the saved packaging choice into the view.
    ///
    /// Product pages consult only the local store. The cart page prefers the
    /// live cart attribute and falls back to the local store, so a choice
    /// made on another device wins. Failures are logged and the widget stays
    /// on its default selection.
    #[instrument(skip(self))]
    pub async fn restore_state(&self) {
        match self.inner.page {
            PageContext::Product => {
                if let Some(choice) = self.load_local_choice() {
                    self.set_choice(choice, false);
                }
            }
            PageContext::Cart => match self.inner.cart.fetch().await {
                Ok(cart) => {
                    let saved = cart
                        .packaging_attribute()
                        .or_else(|| self.load_local_choice());
                    if let Some(choice) = saved {
                        self.set_choice(choice, false);
                        self.refresh_view(Some(choice), &cart);
                    }
                }
                Err(e) => tracing::error!("Error restoring packaging state: {e}"),
            },
        }
    }

    // =========================================================================
    // Choice changes
    // =========================================================================

    /// Entry point for the shopper picking a packaging option.
    ///
    /// On product pages the choice is stored locally and applied once the
    /// shopper reaches the cart. On the cart page it is pushed to the cart
    /// immediately, unless another change is still in flight, in which case
    /// this one is dropped.
    #[instrument(skip(self))]
    pub async fn handle_choice_change(&self, choice: PackagingChoice) -> SyncOutcome {
        match self.inner.page {
            PageContext::Product => {
                self.set_choice(choice, true);
                let outcome = SyncOutcome::Deferred { choice };
                self.emit_outcome(&outcome);
                outcome
            }
            PageContext::Cart => {
                if self.inner.is_updating.load(Ordering::Acquire) {
                    tracing::warn!(choice = %choice, "Cart update already in progress, dropping change");
                    let outcome = SyncOutcome::Dropped { choice };
                    self.emit_outcome(&outcome);
                    return outcome;
                }
                self.set_choice(choice, true);
                self.apply_choice(choice).await
            }
        }
    }

    /// Pushes `choice` to the cart and refreshes everything from the
    /// response.
    ///
    /// The attribute write and the final cart fetch are the hard failure
    /// points. Discount activation in between is best-effort and only warns,
    /// so checkout is never blocked on a discount problem.
    #[instrument(skip(self))]
    pub async fn apply_choice(&self, choice: PackagingChoice) -> SyncOutcome {
        if self.inner.is_updating.swap(true, Ordering::AcqRel) {
            let outcome = SyncOutcome::Dropped { choice };
            self.emit_outcome(&outcome);
            return outcome;
        }
        let guard = InFlightGuard {
            inner: Arc::clone(&self.inner),
        };
        self.inner.view.set_loading(true);

        let result = self.run_apply_pipeline(choice).await;
        drop(guard);

        let strings = strings::for_language(self.inner.config.language);
        let outcome = match result {
            Ok(()) => {
                self.show_status(StatusKind::Success, strings.saved.to_string());
                SyncOutcome::Applied { choice }
            }
            Err(error) => {
                let error = SyncError::from_cart_error(&error);
                self.show_status(
                    StatusKind::Error,
                    format!("{} {}", strings.error_prefix, error.message()),
                );
                SyncOutcome::Failed { choice, error }
            }
        };
        self.emit_outcome(&outcome);
        outcome
    }

    async fn run_apply_pipeline(&self, choice: PackagingChoice) -> Result<(), CartError> {
        self.inner.cart.set_packaging_attribute(choice).await?;

        if choice.is_minimal() {
            self.apply_discount().await;
        } else {
            self.remove_discount().await;
        }

        let cart = self.inner.cart.fetch().await?;
        self.refresh_view(Some(choice), &cart);
        self.emit_cart_updated(choice);
        Ok(())
    }

    /// Updates the selection everywhere except the remote cart.
    pub fn set_choice(&self, choice: PackagingChoice, persist_local: bool) {
        self.inner.view.set_choice(choice);
        self.inner.view.set_badge(choice.is_minimal());
        if persist_local
            && let Err(e) = self.inner.store.set(choice)
        {
            tracing::warn!("Choice store write failed: {e}");
        }
        self.set_last_applied(Some(choice));
    }

    // =========================================================================
    // Discount handling
    // =========================================================================

    /// Activates the configured discount code, debounced so rapid toggling
    /// collapses into a single request.
    ///
    /// Only the newest caller past the debounce window sends the request;
    /// superseded callers return without side effects. All failures
    /// downgrade to warnings.
    #[instrument(skip(self))]
    pub async fn apply_discount(&self) {
        let generation = self
            .inner
            .discount_generation
            .fetch_add(1, Ordering::AcqRel)
            + 1;
        tokio::time::sleep(self.inner.config.debounce).await;
        if self.inner.discount_generation.load(Ordering::Acquire) != generation {
            return;
        }

        let code = &self.inner.config.discount_code;
        match self.inner.cart.apply_discount(code).await {
            Ok(DiscountActivation::Applied) => {
                tracing::debug!(code = %code, "Discount activated");
            }
            Ok(DiscountActivation::UnknownCode) => {
                tracing::debug!(code = %code, "Discount endpoint reported unknown code, skipping");
            }
            Ok(DiscountActivation::Rejected { status }) => {
                tracing::warn!(code = %code, status = %status, "Could not apply discount");
            }
            Err(e) => tracing::warn!(code = %code, "Discount request failed: {e}"),
        }
    }

    /// Clears any cart-level discount. Failures are logged and ignored.
    #[instrument(skip(self))]
    pub async fn remove_discount(&self) {
        if let Err(e) = self.inner.cart.clear_discount().await {
            tracing::warn!("Error removing discount: {e}");
        }
    }

    // =========================================================================
    // Drift detection
    // =========================================================================

    /// Starts the background poll that watches for cart changes made outside
    /// the widget. Replaces any previous poll task.
    ///
    /// The task holds only a weak handle, so dropping the last `EcoSync`
    /// clone ends the poll on its next tick.
    pub fn start_polling(&self) {
        let weak = Arc::downgrade(&self.inner);
        let interval = self.inner.config.poll_interval;
        let max_jitter = self.inner.config.poll_jitter;

        let handle = tokio::spawn(async move {
            loop {
                let jitter = max_jitter.mul_f64(rand::random::<f64>());
                tokio::time::sleep(interval + jitter).await;
                let Some(inner) = weak.upgrade() else { break };
                let sync = Self { inner };
                sync.poll_tick().await;
            }
        });

        if let Ok(mut slot) = self.inner.poll_task.lock()
            && let Some(previous) = slot.replace(handle)
        {
            previous.abort();
        }
    }

    /// One poll iteration. Fetch failures are ignored; the next tick
    /// retries.
    async fn poll_tick(&self) {
        if self.inner.is_updating.load(Ordering::Acquire) {
            return;
        }
        let Ok(cart) = self.inner.cart.fetch().await else {
            return;
        };
        if let Some(cart_choice) = cart.packaging_attribute()
            && self.last_applied() != Some(cart_choice)
        {
            self.reconcile().await;
        }
    }

    /// Re-reads the cart and realigns the widget with whatever choice it
    /// finds. Called after external cart changes (theme events, other tabs,
    /// other devices).
    #[instrument(skip(self))]
    pub async fn reconcile(&self) {
        match self.inner.cart.fetch().await {
            Ok(cart) => {
                let saved = cart
                    .packaging_attribute()
                    .or_else(|| self.load_local_choice());
                if let Some(choice) = saved
                    && self.last_applied() != Some(choice)
                {
                    self.set_choice(choice, false);
                    self.refresh_view(Some(choice), &cart);
                }
            }
            Err(e) => tracing::error!("Error syncing cart state: {e}"),
        }
    }

    /// Stops the background poll. Idempotent.
    pub fn shutdown(&self) {
        if let Ok(mut slot) = self.inner.poll_task.lock()
            && let Some(handle) = slot.take()
        {
            handle.abort();
        }
    }

    // =========================================================================
    // View and bookkeeping
    // =========================================================================

    /// Shows a status line; non-error statuses clear themselves after
    /// [`STATUS_HOLD`] unless a newer status replaced them.
    pub(crate) fn show_status(&self, kind: StatusKind, text: String) {
        let generation = self.inner.status_generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.inner.view.show_status(StatusMessage { kind, text });

        if kind != StatusKind::Error {
            let weak = Arc::downgrade(&self.inner);
            tokio::spawn(async move {
                tokio::time::sleep(STATUS_HOLD).await;
                if let Some(inner) = weak.upgrade()
                    && inner.status_generation.load(Ordering::Acquire) == generation
                {
                    inner.view.clear_status();
                }
            });
        }
    }

    /// Recomputes the eligibility notice from a fresh cart snapshot.
    ///
    /// The notice only shows while the shopper has minimal packaging
    /// selected and nothing in the cart qualifies.
    fn refresh_view(&self, choice: Option<PackagingChoice>, cart: &CartSnapshot) {
        let eligibility = check_eligibility(cart, &self.inner.config);
        if !eligibility.is_eligible && choice.is_some_and(|c| c.is_minimal()) {
            self.inner
                .view
                .set_eligibility_notice(Some(eligibility.reason));
        } else {
            self.inner.view.set_eligibility_notice(None);
        }
    }

    fn load_local_choice(&self) -> Option<PackagingChoice> {
        match self.inner.store.get() {
            Ok(choice) => choice,
            Err(e) => {
                tracing::warn!("Choice store read failed: {e}");
                None
            }
        }
    }

    fn set_last_applied(&self, choice: Option<PackagingChoice>) {
        if let Ok(mut slot) = self.inner.last_applied.lock() {
            *slot = choice;
        }
    }

    fn last_applied(&self) -> Option<PackagingChoice> {
        self.inner
            .last_applied
            .lock()
            .map(|slot| *slot)
            .unwrap_or(None)
    }

    fn emit_outcome(&self, outcome: &SyncOutcome) {
        (self.inner.on_outcome)(outcome);
    }

    fn emit_cart_updated(&self, choice: PackagingChoice) {
        let _ = self.inner.events.send(CartEvent::Updated { choice });
    }
}

impl std::fmt::Debug for EcoSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcoSync")
            .field("page", &self.inner.page)
            .field(
                "is_updating",
                &self.inner.is_updating.load(Ordering::Relaxed),
            )
            .finish_non_exhaustive()
    }
}
