//! HTTP middleware for the admin service.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, outermost)
//! 2. Request ID (correlation)
//! 3. Trace layer (request logging)
//!
//! There is no session or login middleware here: access control is
//! delegated to the Shopify Admin API token, and pages without a valid
//! token render empty data instead of redirecting.

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
