//! Unified error handling for admin.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::settings::SettingsError;
use crate::shopify::AdminApiError;

/// Application-level error type for the admin pages.
///
/// The read-only pages rarely surface this: loaders fail open to empty
/// data. It covers the write paths (settings) and the Shopify boundary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] AdminApiError),

    /// Settings persistence failed.
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Admin request error"
        );

        let status = match &self {
            Self::Settings(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Shopify(_) => StatusCode::BAD_GATEWAY,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Settings(_) => "Internal server error",
            Self::Shopify(_) => "External service error",
        };

        (status, message).into_response()
    }
}

/// Convenience alias for handler results.
pub type Result<T> = std::result::Result<T, AppError>;
