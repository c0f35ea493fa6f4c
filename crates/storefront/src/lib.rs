//! Eco-packaging storefront library.
//!
//! Serves the packaging-choice widget as HTMX fragments and keeps each
//! shopper's choice synchronized with their cart. Exposed as a library so
//! the routes and synchronizer can be exercised from integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod shopify;
pub mod state;
pub mod store;
pub mod sync;
