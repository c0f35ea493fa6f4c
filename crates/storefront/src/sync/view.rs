//! Widget view adapter.
//!
//! The synchronizer drives an abstract view instead of markup. The
//! production implementation is [`SharedView`], a snapshot the fragment
//! renderer reads on every request; tests swap in a recorder.

use std::sync::{Arc, RwLock};

use eco_packaging_core::PackagingChoice;

/// Visual flavor of a status message, mapped to a CSS modifier class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
}

impl StatusKind {
    /// CSS modifier suffix for the status element.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A status line shown under the widget controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

/// Everything the widget fragment needs to render.
#[derive(Debug, Clone, Default)]
pub struct WidgetViewState {
    /// Currently selected option, `None` until restored or chosen.
    pub choice: Option<PackagingChoice>,
    /// Whether the eco badge is visible.
    pub badge_visible: bool,
    /// True while a cart update is in flight.
    pub loading: bool,
    /// Transient status line, auto-cleared unless it reports an error.
    pub status: Option<StatusMessage>,
    /// Persistent notice shown while the cart is ineligible.
    pub eligibility_notice: Option<String>,
}

/// Sink for synchronizer-driven view updates.
pub trait SyncView: Send + Sync {
    fn set_choice(&self, choice: PackagingChoice);
    fn set_badge(&self, visible: bool);
    fn set_loading(&self, loading: bool);
    fn show_status(&self, message: StatusMessage);
    fn clear_status(&self);
    fn set_eligibility_notice(&self, notice: Option<String>);
}

/// Shared view state behind a lock.
///
/// Writes no-op if the lock is poisoned; the next successful write restores
/// a consistent snapshot.
#[derive(Debug, Clone, Default)]
pub struct SharedView {
    state: Arc<RwLock<WidgetViewState>>,
}

impl SharedView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current view state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> WidgetViewState {
        self.state
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn update(&self, apply: impl FnOnce(&mut WidgetViewState)) {
        if let Ok(mut guard) = self.state.write() {
            apply(&mut guard);
        }
    }
}

impl SyncView for SharedView {
    fn set_choice(&self, choice: PackagingChoice) {
        self.update(|state| state.choice = Some(choice));
    }

    fn set_badge(&self, visible: bool) {
        self.update(|state| state.badge_visible = visible);
    }

    fn set_loading(&self, loading: bool) {
        self.update(|state| state.loading = loading);
    }

    fn show_status(&self, message: StatusMessage) {
        self.update(|state| state.status = Some(message));
    }

    fn clear_status(&self) {
        self.update(|state| state.status = None);
    }

    fn set_eligibility_notice(&self, notice: Option<String>) {
        self.update(|state| state.eligibility_notice = notice);
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_writes() {
        let view = SharedView::new();
        view.set_choice(PackagingChoice::Minimal);
        view.set_badge(true);
        view.set_loading(true);

        let state = view.snapshot();
        assert_eq!(state.choice, Some(PackagingChoice::Minimal));
        assert!(state.badge_visible);
        assert!(state.loading);
    }

    #[test]
    fn test_clones_share_state() {
        let view = SharedView::new();
        let other = view.clone();
        view.show_status(StatusMessage {
            kind: StatusKind::Success,
            text: "saved".to_string(),
        });

        assert_eq!(
            other.snapshot().status.unwrap().text,
            "saved".to_string()
        );
    }

    #[test]
    fn test_status_and_notice_are_independent() {
        let view = SharedView::new();
        view.set_eligibility_notice(Some("no discount".to_string()));
        view.show_status(StatusMessage {
            kind: StatusKind::Error,
            text: "boom".to_string(),
        });
        view.clear_status();

        let state = view.snapshot();
        assert!(state.status.is_none());
        assert_eq!(state.eligibility_notice.as_deref(), Some("no discount"));
    }
}
