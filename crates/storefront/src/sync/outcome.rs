//! Explicit results for cart synchronization attempts.
//!
//! Every entry point of the synchronizer resolves to a [`SyncOutcome`] and
//! hands it to the configured [`OutcomeHandler`], so callers can react to
//! dropped or failed changes instead of reading logs.

use std::sync::Arc;

use eco_packaging_core::PackagingChoice;

use crate::shopify::CartError;

/// Terminal result of one choice-change or apply attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The choice was written to the cart and the view refreshed.
    Applied { choice: PackagingChoice },
    /// Product-page context: stored locally, applied when the shopper
    /// reaches the cart.
    Deferred { choice: PackagingChoice },
    /// Another change was still in flight; this one was discarded.
    Dropped { choice: PackagingChoice },
    /// The apply pipeline failed at a hard failure point.
    Failed {
        choice: PackagingChoice,
        error: SyncError,
    },
}

impl SyncOutcome {
    /// The choice this outcome refers to.
    #[must_use]
    pub const fn choice(&self) -> PackagingChoice {
        match self {
            Self::Applied { choice }
            | Self::Deferred { choice }
            | Self::Dropped { choice }
            | Self::Failed { choice, .. } => *choice,
        }
    }

    /// Short label for logs and response payloads.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Applied { .. } => "applied",
            Self::Deferred { .. } => "deferred",
            Self::Dropped { .. } => "dropped",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Failure classification carried by [`SyncOutcome::Failed`].
///
/// Holds the rendered message rather than the source error so outcomes stay
/// cloneable across the handler boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// Transient: transport failures, rate limiting, server errors.
    #[error("{0}")]
    Retryable(String),
    /// Permanent for this request: client errors, unparseable payloads.
    #[error("{0}")]
    Fatal(String),
}

impl SyncError {
    pub(crate) fn from_cart_error(error: &CartError) -> Self {
        let message = error.to_string();
        if error.is_retryable() {
            Self::Retryable(message)
        } else {
            Self::Fatal(message)
        }
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable(_))
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Retryable(message) | Self::Fatal(message) => message,
        }
    }
}

/// Callback invoked with every terminal outcome.
pub type OutcomeHandler = Arc<dyn Fn(&SyncOutcome) + Send + Sync>;

/// Default handler: logs and otherwise stays out of the shopper's way.
#[must_use]
pub fn logging_handler() -> OutcomeHandler {
    Arc::new(|outcome| match outcome {
        SyncOutcome::Applied { choice } => {
            tracing::debug!(choice = %choice, "Packaging choice applied");
        }
        SyncOutcome::Deferred { choice } => {
            tracing::debug!(choice = %choice, "Packaging choice deferred until cart");
        }
        SyncOutcome::Dropped { choice } => {
            tracing::debug!(choice = %choice, "Packaging change dropped");
        }
        SyncOutcome::Failed { choice, error } => {
            tracing::warn!(choice = %choice, error = %error, "Packaging sync failed");
        }
    })
}
