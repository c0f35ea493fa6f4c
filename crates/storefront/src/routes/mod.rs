//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check
//!
//! # Widget (HTMX fragments)
//! GET  /widget                 - Widget fragment (?page=product|cart)
//! POST /widget/choice          - Apply a packaging choice, returns fragment
//! POST /widget/reconcile       - Realign after an external cart change
//! GET  /widget/state           - View state as JSON (for theme scripts)
//! ```

pub mod widget;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the widget routes router.
pub fn widget_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(widget::show))
        .route("/choice", post(widget::choose))
        .route("/reconcile", post(widget::reconcile))
        .route("/state", get(widget::view_state))
}

/// Create the main application router with all routes.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/widget", widget_routes())
}
