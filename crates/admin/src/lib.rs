//! Eco-packaging admin library.
//!
//! This crate provides the merchant dashboard as a library, allowing it
//! to be tested and reused (the CLI reads orders and settings through
//! it).
//!
//! # Security
//!
//! This crate holds the Shopify Admin API token. Only the `read_orders`
//! scope is needed; nothing here writes back to Shopify.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod settings;
pub mod shopify;
pub mod state;
