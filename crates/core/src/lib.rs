//! Eco Packaging Core - Shared types library.
//!
//! This crate provides common types used across all eco-packaging components:
//! - `storefront` - Widget service embedded in the shop theme
//! - `admin` - Merchant-facing dashboard and settings panel
//! - `cli` - Command-line tools for operators
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Packaging choice, app settings, and the shared key constants

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
