//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions. The session carries
//! nothing but the shopper's synchronizer id; losing it on restart means a
//! fresh widget, which the cart attribute restores anyway.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "eco_session";

/// Session keys for widget state.
pub mod session_keys {
    /// Key for the shopper's synchronizer id.
    pub const SYNC_ID: &str = "sync_id";
}

/// Create the session layer with an in-memory store.
///
/// Cookie expiry follows the synchronizer TTL, so the session and its
/// registry entry age out together.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();
    let ttl_seconds = i64::try_from(config.session_ttl.as_secs()).unwrap_or(i64::MAX);

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(ttl_seconds),
        ))
        // TLS terminates at the app proxy in front of this service.
        .with_secure(false)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
