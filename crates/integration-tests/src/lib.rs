//! Integration tests for the eco-packaging services.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p eco-packaging-integration-tests
//! ```
//!
//! The suites run the real routers in-process and need no external
//! services:
//!
//! - `widget_sync` drives the storefront widget router against a wiremock
//!   stand-in for the cart AJAX endpoints, session cookie and all.
//! - `admin_pages` drives the dashboard router against a wiremock stand-in
//!   for the Shopify Admin GraphQL endpoint; settings pages write real
//!   JSON blobs under per-test temp directories.
//!
//! The `#[ignore]`d tests at the bottom of `admin_pages` additionally hit
//! a live server. Point `ADMIN_BASE_URL` at a running dashboard to
//! exercise them:
//!
//! ```bash
//! ADMIN_BASE_URL=http://localhost:3001 \
//!     cargo test -p eco-packaging-integration-tests -- --ignored
//! ```

pub mod support;
