//! Cart AJAX API client implementation.
//!
//! One client per shopper session. The client keeps a cookie jar because the
//! platform identifies the cart by cookie; without it every call would see a
//! fresh empty cart.

pub mod types;

use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;
use url::Url;

use crate::shopify::CartError;
use eco_packaging_core::{ECO_PACKAGING_ATTRIBUTE, PackagingChoice};
use types::CartSnapshot;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("eco-packaging-storefront/", env!("CARGO_PKG_VERSION"));

/// Outcome of a discount activation request.
///
/// A 404 means the code is unknown or already consumed and is not treated
/// as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountActivation {
    /// The platform accepted the code.
    Applied,
    /// HTTP 404: unknown or already-applied code.
    UnknownCode,
    /// Any other non-success status.
    Rejected { status: reqwest::StatusCode },
}

/// Client for the theme-scoped cart AJAX endpoints.
#[derive(Clone)]
pub struct CartClient {
    inner: Arc<CartClientInner>,
}

struct CartClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl CartClient {
    /// Create a new cart client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Http` if the underlying HTTP client cannot be
    /// built.
    pub fn new(mut base_url: Url) -> Result<Self, CartError> {
        // Join below is relative, so the base path must end with a slash or
        // its last segment would be replaced.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner: Arc::new(CartClientInner { client, base_url }),
        })
    }

    /// Fetch the current cart state.
    ///
    /// # Errors
    ///
    /// Returns `CartError` on transport failure, non-success status, or an
    /// unparseable payload.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<CartSnapshot, CartError> {
        let url = self.endpoint("cart.js")?;
        let response = self.inner.client.get(url).send().await?;
        let response = ensure_success(response).await?;

        let body = response.text().await?;
        let cart: CartSnapshot = serde_json::from_str(&body)?;
        Ok(cart)
    }

    /// Write the packaging choice to the cart attribute.
    ///
    /// # Errors
    ///
    /// Returns `CartError` on transport failure or non-success status.
    #[instrument(skip(self))]
    pub async fn set_packaging_attribute(
        &self,
        choice: PackagingChoice,
    ) -> Result<(), CartError> {
        self.post_update(serde_json::json!({
            "attributes": { ECO_PACKAGING_ATTRIBUTE: choice.as_str() }
        }))
        .await
    }

    /// Remove any active discount from the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError` on transport failure or non-success status.
    #[instrument(skip(self))]
    pub async fn clear_discount(&self) -> Result<(), CartError> {
        self.post_update(serde_json::json!({ "discount": "" })).await
    }

    /// Activate a discount code against the cart.
    ///
    /// Never fails on HTTP status; see [`DiscountActivation`]. Only transport
    /// failures surface as errors.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Http` if the request cannot be sent.
    #[instrument(skip(self))]
    pub async fn apply_discount(&self, code: &str) -> Result<DiscountActivation, CartError> {
        let url = self.endpoint(&format!("discount/{code}"))?;
        let response = self.inner.client.post(url).send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(DiscountActivation::Applied)
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Ok(DiscountActivation::UnknownCode)
        } else {
            Ok(DiscountActivation::Rejected { status })
        }
    }

    async fn post_update(&self, body: serde_json::Value) -> Result<(), CartError> {
        let url = self.endpoint("cart/update.js")?;
        let response = self
            .inner
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        // The update payload echoes the cart; the synchronizer refetches
        // instead of trusting it, so the body is dropped here.
        ensure_success(response).await?;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, CartError> {
        Ok(self.inner.base_url.join(path)?)
    }
}

/// Map rate limiting and non-success statuses to typed errors.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, CartError> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1);
        return Err(CartError::RateLimited(retry_after));
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!(
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "Cart endpoint returned non-success status"
        );
        return Err(CartError::Status { status });
    }

    Ok(response)
}
