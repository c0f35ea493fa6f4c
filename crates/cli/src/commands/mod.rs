//! CLI command implementations.
//!
//! Each command reads its own environment (via `.env` where present):
//! the settings commands only need `ADMIN_DATA_DIR`, while `orders` and
//! `metrics` need the Shopify configuration the admin service uses.

pub mod metrics;
pub mod orders;
pub mod settings;
