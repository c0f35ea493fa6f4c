//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_CART_BASE_URL` - Cart API base URL override (default: `https://{SHOPIFY_STORE}`)
//! - `STOREFRONT_DATA_DIR` - Directory for file-backed choice storage (default: ./data)
//! - `ECO_DISCOUNT_CODE` - Discount code to activate for minimal packaging (default: ECO5)
//! - `ECO_EXCLUDE_PRODUCT_TYPES` - Comma-separated product types never eligible (default: gift_card)
//! - `ECO_EXCLUDE_PRODUCT_TAGS` - Comma-separated property tags never eligible (default: no_eco_discount)
//! - `ECO_LANGUAGE` - Widget language, en or da (default: en)
//! - `ECO_DEBOUNCE_MS` - Discount activation debounce (default: 300)
//! - `ECO_POLL_INTERVAL_SECS` - Cart drift poll interval (default: 5)
//! - `ECO_POLL_JITTER_MS` - Max random jitter added to each poll tick (default: 1000)
//! - `ECO_SESSION_TTL_SECS` - Idle lifetime of a shopper's synchronizer (default: 1800)
//! - `ECO_CHOICE_PERSISTENCE` - Choice store backend, `memory` or `file` (default: memory)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag (e.g., production, staging)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use eco_packaging_core::Language;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store: String,
    /// Base URL for the cart AJAX endpoints
    pub cart_base_url: Url,
    /// Widget behavior knobs
    pub widget: WidgetConfig,
    /// Idle lifetime of a shopper's synchronizer before it is swept
    pub session_ttl: Duration,
    /// Backend for the shopper-local choice store
    pub choice_persistence: ChoicePersistence,
    /// Directory for file-backed choice storage
    pub data_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Tunables for the cart-state synchronizer and eligibility rules.
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    /// Discount code activated when the shopper picks minimal packaging
    pub discount_code: String,
    /// Product types that are never eligible for the discount
    pub exclude_product_types: Vec<String>,
    /// Line-item property tags that are never eligible for the discount
    pub exclude_product_tags: Vec<String>,
    /// Widget display language
    pub language: Language,
    /// Debounce window for discount activation
    pub debounce: Duration,
    /// Base interval between cart drift polls
    pub poll_interval: Duration,
    /// Max random jitter added to each poll tick
    pub poll_jitter: Duration,
}

/// Where the shopper's last choice is persisted between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoicePersistence {
    /// Held in memory for the life of the session entry.
    Memory,
    /// Written to a JSON file per session under the data directory.
    File,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or any value
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;

        let store = get_required_env("SHOPIFY_STORE")?;
        let cart_base_url = get_optional_env("STOREFRONT_CART_BASE_URL")
            .map_or_else(|| format!("https://{store}"), |url| url)
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_CART_BASE_URL".to_string(), e.to_string())
            })?;

        let widget = WidgetConfig::from_env()?;
        let session_ttl = Duration::from_secs(get_env_parsed("ECO_SESSION_TTL_SECS", 1800)?);
        let choice_persistence = match get_env_or_default("ECO_CHOICE_PERSISTENCE", "memory")
            .to_lowercase()
            .as_str()
        {
            "memory" => ChoicePersistence::Memory,
            "file" => ChoicePersistence::File,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "ECO_CHOICE_PERSISTENCE".to_string(),
                    format!("expected 'memory' or 'file', got '{other}'"),
                ));
            }
        };
        let data_dir = PathBuf::from(get_env_or_default("STOREFRONT_DATA_DIR", "./data"));
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            store,
            cart_base_url,
            widget,
            session_ttl,
            choice_persistence,
            data_dir,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl WidgetConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let language = get_env_or_default("ECO_LANGUAGE", "en")
            .parse::<Language>()
            .map_err(|e| ConfigError::InvalidEnvVar("ECO_LANGUAGE".to_string(), e))?;

        Ok(Self {
            discount_code: get_env_or_default("ECO_DISCOUNT_CODE", "ECO5"),
            exclude_product_types: parse_list(&get_env_or_default(
                "ECO_EXCLUDE_PRODUCT_TYPES",
                "gift_card",
            )),
            exclude_product_tags: parse_list(&get_env_or_default(
                "ECO_EXCLUDE_PRODUCT_TAGS",
                "no_eco_discount",
            )),
            language,
            debounce: Duration::from_millis(get_env_parsed("ECO_DEBOUNCE_MS", 300)?),
            poll_interval: Duration::from_secs(get_env_parsed("ECO_POLL_INTERVAL_SECS", 5)?),
            poll_jitter: Duration::from_millis(get_env_parsed("ECO_POLL_JITTER_MS", 1000)?),
        })
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            discount_code: "ECO5".to_string(),
            exclude_product_types: vec!["gift_card".to_string()],
            exclude_product_tags: vec!["no_eco_discount".to_string()],
            language: Language::En,
            debounce: Duration::from_millis(300),
            poll_interval: Duration::from_secs(5),
            poll_jitter: Duration::from_millis(1000),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable parsed as `u64`, with a default.
fn get_env_parsed(key: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated list, trimming and lowercasing each entry.
///
/// Eligibility matching is case-insensitive, so entries are normalized once
/// here instead of on every cart check.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|entry| entry.trim().to_lowercase())
        .filter(|entry| !entry.is_empty())
        .collect()
}
