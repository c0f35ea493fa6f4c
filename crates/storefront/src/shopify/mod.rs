//! Shopify cart AJAX client.
//!
//! # Architecture
//!
//! - The cart is Shopify's - NO local copy, direct API calls on every sync point
//! - Endpoints are the theme-scoped AJAX API: `GET /cart.js`,
//!   `POST /cart/update.js`, `POST /discount/:code`
//! - One client per shopper session; the cookie jar carries cart identity
//!
//! # Example
//!
//! ```rust,ignore
//! use eco_packaging_storefront::shopify::CartClient;
//!
//! let client = CartClient::new(config.cart_base_url.clone())?;
//!
//! let cart = client.fetch().await?;
//! client.set_packaging_attribute(PackagingChoice::Minimal).await?;
//! client.apply_discount("ECO5").await?;
//! ```

pub mod cart;

pub use cart::{CartClient, DiscountActivation};
pub use cart::types::{CartItem, CartSnapshot};

use thiserror::Error;

/// Errors that can occur when talking to the cart AJAX endpoints.
#[derive(Debug, Error)]
pub enum CartError {
    /// HTTP request failed (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint returned a non-success status.
    #[error("Cart endpoint returned {status}")]
    Status { status: reqwest::StatusCode },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The configured base URL cannot be joined with an endpoint path.
    #[error("Invalid cart URL: {0}")]
    Url(#[from] url::ParseError),
}

impl CartError {
    /// Whether a retry on the next sync point could plausibly succeed.
    ///
    /// Transport failures, rate limits, and server-side errors are
    /// retryable; client-side statuses and parse failures are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::RateLimited(_) => true,
            Self::Status { status } => status.is_server_error(),
            Self::Parse(_) | Self::Url(_) => false,
        }
    }
}
